//! Action token cache.

use crate::client::ReaderClient;
use crate::constants::TOKEN_PATH;
use crate::credential::ActionToken;
use greader_core::{Redact, Result};
use log::{debug, info};
use tokio::sync::Mutex;

/// Holds the current action token, if any.
///
/// The slot's mutex is held across a refresh, which serializes concurrent
/// refreshes and makes the (value, timestamp) swap atomic: callers either
/// see the previous complete token or the new complete token.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<ActionToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl ReaderClient {
    /// Current action token, refreshed through a signed GET when stale.
    ///
    /// Staleness is decided purely by the acquisition timestamp; a token
    /// older than the validity window is refetched even if its last use
    /// succeeded.
    pub(crate) async fn action_token(&self) -> Result<String> {
        let mut slot = self.token.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            if token.is_valid(self.token_validity) {
                return Ok(token.value().to_string());
            }
        }

        let url = self.api_url(TOKEN_PATH);
        info!("refreshing action token");
        let req = self.signer.get(&url)?;
        let body = self.ctx.fetch(req).await?;
        let token = ActionToken::new(String::from_utf8(body.to_vec())?);
        debug!("action token refreshed: {:?}", Redact::from(token.value()));

        let value = token.value().to_string();
        *slot = Some(token);
        Ok(value)
    }
}
