use crate::constants::{
    LOGIN_ROOT, SERVICE_ROOT, TOKEN_VALID_SECS, TRIM_LOG_MESSAGES_AT,
};
use crate::identity::IdentityCache;
use crate::session::obtain_session;
use crate::signer::CallSigner;
use crate::token::TokenCache;
use bytes::Bytes;
use chrono::TimeDelta;
use greader_core::{Context, Error, Result};
use log::{debug, info};
use std::time::Duration;

/// Client for one Reader account.
///
/// Construction performs the login handshake; the client only exists once
/// a session credential has been obtained. All shared mutable state (the
/// action token, the account id, the feed first-item cache) sits behind
/// async mutexes, so independent calls may run concurrently on one client.
#[derive(Debug)]
pub struct ReaderClient {
    pub(crate) ctx: Context,
    pub(crate) service_root: String,
    pub(crate) signer: CallSigner,
    pub(crate) token: TokenCache,
    pub(crate) identity: IdentityCache,
    pub(crate) token_validity: TimeDelta,
}

impl ReaderClient {
    /// Create a builder for a client with non-default settings.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Log into the service with default settings.
    pub async fn login(ctx: Context, email: &str, password: &str) -> Result<Self> {
        Builder::new().login(ctx, email, password).await
    }

    /// Absolute url of an API path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.service_root, path)
    }

    /// Signed GET; returns the raw reply body.
    pub(crate) async fn call(&self, url: &str) -> Result<Bytes> {
        info!("calling {url}");
        let req = self.signer.get(url)?;
        let body = self.ctx.fetch(req).await?;
        debug!("reply: {}", trim_log(&String::from_utf8_lossy(&body)));
        Ok(body)
    }

    /// Signed form POST; returns the raw reply body.
    pub(crate) async fn call_form(&self, url: &str, params: &[(&str, &str)]) -> Result<Bytes> {
        info!(
            "calling {url} with parameters: {}",
            trim_log(&format!("{:?}", LoggedParams(params)))
        );
        let req = self.signer.post(url, params)?;
        let body = self.ctx.fetch(req).await?;
        debug!("reply: {}", trim_log(&String::from_utf8_lossy(&body)));
        Ok(body)
    }

    /// Signed GET decoded as UTF-8 text.
    pub(crate) async fn call_text(&self, url: &str) -> Result<String> {
        let body = self.call(url).await?;
        Ok(String::from_utf8(body.to_vec())?)
    }

    /// Signed form POST decoded as UTF-8 text.
    pub(crate) async fn call_form_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String> {
        let body = self.call_form(url, params).await?;
        Ok(String::from_utf8(body.to_vec())?)
    }
}

/// Configures and constructs a [`ReaderClient`].
///
/// The endpoint roots exist so tests (or a proxy deployment) can point the
/// client elsewhere; the token validity knob exists for the same reason
/// and defaults to the service's 60 second window.
#[derive(Debug, Clone)]
pub struct Builder {
    service_root: String,
    login_root: String,
    token_validity: TimeDelta,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Create a builder with the default service endpoints.
    pub fn new() -> Self {
        Self {
            service_root: SERVICE_ROOT.to_string(),
            login_root: LOGIN_ROOT.to_string(),
            token_validity: TimeDelta::seconds(TOKEN_VALID_SECS),
        }
    }

    /// Override the root url API and atom calls go to.
    pub fn with_service_root(mut self, root: impl Into<String>) -> Self {
        self.service_root = root.into();
        self
    }

    /// Override the root url of the login endpoint.
    pub fn with_login_root(mut self, root: impl Into<String>) -> Self {
        self.login_root = root.into();
        self
    }

    /// Override how long a fetched action token is considered valid.
    pub fn with_token_validity(mut self, validity: Duration) -> Self {
        self.token_validity =
            TimeDelta::from_std(validity).unwrap_or_else(|_| TimeDelta::seconds(TOKEN_VALID_SECS));
        self
    }

    /// Perform the login handshake and return the ready client.
    ///
    /// Fails atomically: a rejected login means no client.
    pub async fn login(self, ctx: Context, email: &str, password: &str) -> Result<ReaderClient> {
        let credential =
            obtain_session(&ctx, &self.login_root, &self.service_root, email, password).await?;
        Ok(ReaderClient {
            ctx,
            service_root: self.service_root,
            signer: CallSigner::new(credential),
            token: TokenCache::new(),
            identity: IdentityCache::new(),
            token_validity: self.token_validity,
        })
    }
}

/// Debug view of form params with the action token blanked out.
struct LoggedParams<'a>(&'a [(&'a str, &'a str)]);

impl std::fmt::Debug for LoggedParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.0 {
            if *key == "T" {
                map.entry(key, &"***");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

/// Trim a log payload to a readable length.
pub(crate) fn trim_log(text: &str) -> String {
    if text.chars().count() <= TRIM_LOG_MESSAGES_AT {
        text.to_string()
    } else {
        text.chars().take(TRIM_LOG_MESSAGES_AT).collect()
    }
}

/// Decode a structured reply, wrapping parse failures with the raw body.
pub(crate) fn decode_json(body: &str) -> Result<serde_json::Value> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("unparseable reply: {}", trim_log(body));
        Error::operation_failed("reply is not valid JSON")
            .with_body(body.to_string())
            .with_source(e)
    })
}
