//! Scripted HTTP transport used by the integration tests.

use async_trait::async_trait;
use bytes::Bytes;
use greader_core::HttpSend;
use http::StatusCode;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub body: String,
}

/// Replays queued responses and records every request.
///
/// Clones share the same queue and log, so a test keeps one clone while
/// the context owns the other.
#[derive(Clone, Default)]
pub struct MockHttpSend {
    responses: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, status: StatusCode, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
    }

    pub fn push_ok(&self, body: impl Into<String>) {
        self.push(StatusCode::OK, body);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// Requests whose uri contains the given fragment.
    pub fn requests_to(&self, fragment: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.uri.contains(fragment))
            .collect()
    }
}

impl fmt::Debug for MockHttpSend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHttpSend")
            .field("queued", &self.responses.lock().unwrap().len())
            .field("seen", &self.log.lock().unwrap().len())
            .finish()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> anyhow::Result<http::Response<Bytes>> {
        let header = |name: http::header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.log.lock().unwrap().push(Recorded {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            authorization: header(http::header::AUTHORIZATION),
            user_agent: header(http::header::USER_AGENT),
            body: String::from_utf8_lossy(req.body()).into_owned(),
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("mock transport ran out of responses"))?;
        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .expect("response must build"))
    }
}
