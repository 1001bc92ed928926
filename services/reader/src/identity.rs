//! Lazy identity resolution: account id, tag ids, feed first-item ids.

use crate::atom::Format;
use crate::client::ReaderClient;
use crate::streams::StreamOptions;
use crate::types::{account_id_of, FeedId, Tag};
use greader_core::{Error, Result};
use log::debug;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Lazily discovered facts about the account, cached for the client's
/// lifetime. Entries are never invalidated: the account id cannot change,
/// and a feed's first item is only needed transiently during edits.
#[derive(Debug, Default)]
pub(crate) struct IdentityCache {
    account_id: Mutex<Option<String>>,
    feed_items: Mutex<HashMap<String, String>>,
}

impl IdentityCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl ReaderClient {
    /// Numeric account id of the authenticated user.
    ///
    /// Discovered on first use by scanning the tag list for an id of the
    /// shape `user/<digits>/...`. A tag list without such an entry is an
    /// error: constructing tag ids from a missing account id would only
    /// produce malformed identifiers downstream.
    pub async fn account_id(&self) -> Result<String> {
        let mut slot = self.identity.account_id.lock().await;
        if let Some(id) = slot.as_ref() {
            return Ok(id.clone());
        }

        let list = self.fetch_tag_list().await?;
        let id = list
            .tags
            .iter()
            .find_map(|tag| account_id_of(&tag.id))
            .ok_or_else(|| {
                Error::operation_failed("tag list carries no user/<id> entry, cannot resolve account id")
            })?
            .to_string();
        debug!("resolved account id {id}");
        *slot = Some(id.clone());
        Ok(id)
    }

    /// Resolve a tag to its fully qualified id.
    ///
    /// `Tag::Id` passes through unchanged; `Tag::Name` becomes
    /// `user/<account id>/label/<name>`.
    pub async fn tag_id(&self, tag: &Tag) -> Result<String> {
        match tag {
            Tag::Id(id) => Ok(id.clone()),
            Tag::Name(name) => {
                let account = self.account_id().await?;
                Ok(format!("user/{account}/label/{name}"))
            }
        }
    }

    /// Identifier of the first item of the given feed.
    ///
    /// Needed by some subscription edits. Fetched once per feed (asking
    /// for 2 items) and cached under the canonical feed id.
    pub async fn feed_item_id(&self, feed: &FeedId) -> Result<String> {
        let mut cache = self.identity.feed_items.lock().await;
        if let Some(id) = cache.get(feed.as_str()) {
            return Ok(id.clone());
        }

        let atom = self
            .feed_atom(
                feed,
                &StreamOptions::new().with_count(2).with_format(Format::Parsed),
            )
            .await?;
        let parsed = atom
            .as_feed()
            .ok_or_else(|| Error::unexpected("parsed atom decode yielded a non-feed payload"))?;
        let id = parsed
            .entries
            .first()
            .map(|entry| entry.id.clone())
            .ok_or_else(|| {
                Error::operation_failed(format!("feed {} has no entries", feed.as_str()))
            })?;

        cache.insert(feed.as_str().to_string(), id.clone());
        Ok(id)
    }
}
