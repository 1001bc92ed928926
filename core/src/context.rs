// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use std::fmt::Debug;
use std::sync::Arc;

/// Context carries the HTTP sending implementation used by the client.
///
/// It is the single point through which every network request travels,
/// which is what makes the client testable: swap in an [`HttpSend`] double
/// and no real network is touched.
///
/// ## Example
///
/// ```no_run
/// use greader_core::Context;
///
/// let ctx = Context::new();
/// // All components use no-op implementations by default.
/// // Configure a real HTTP client before use:
/// // ctx.with_http_send(my_http_client)
/// ```
#[derive(Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("http", &self.http).finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with a no-op HTTP implementation.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
        }
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Send an http request and return the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http
            .http_send(req)
            .await
            .map_err(|e| Error::transport_failed("http send failed").with_source(e))
    }

    /// Send an http request, require a success status, and return the body.
    ///
    /// Any non-2xx response becomes a transport error carrying the status
    /// and the reply body. Callers that need a different take on a status
    /// (the login handshake's 403 path) use [`Context::http_send`] instead.
    pub async fn fetch(&self, req: http::Request<Bytes>) -> Result<Bytes> {
        let resp = self.http_send(req).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = String::from_utf8_lossy(resp.body()).into_owned();
            return Err(Error::transport_failed(format!(
                "service replied with status {status}"
            ))
            .with_status(status)
            .with_body(body));
        }
        Ok(resp.into_body())
    }
}

/// HttpSend is used to send http requests on behalf of the client.
///
/// This trait exists so the network backend stays pluggable: production
/// code wires in a real client, tests wire in a scripted double.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> anyhow::Result<http::Response<Bytes>>;
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> anyhow::Result<http::Response<Bytes>> {
        Err(anyhow::anyhow!(
            "HTTP sending not supported: no HTTP client configured"
        ))
    }
}
