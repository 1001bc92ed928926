//! Article listings as Atom feeds.

use crate::atom::{self, Atom, Format};
use crate::client::ReaderClient;
use crate::constants::{GET_FEED_PREFIX, IN_STATE_PREFIX, READING_TAG_PREFIX};
use crate::signer::quote_plus;
use crate::types::{FeedId, Tag};
use greader_core::Result;

/// Options shared by every article-listing operation.
///
/// Parameters are only put on the wire when set; the service default count
/// is 20.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    count: Option<u32>,
    older_first: bool,
    continue_from: Option<String>,
    format: Format,
}

impl StreamOptions {
    /// Options with service defaults and [`Format::Parsed`] decoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many articles to fetch.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Scan from the oldest articles instead of the newest.
    pub fn with_older_first(mut self, older_first: bool) -> Self {
        self.older_first = older_first;
        self
    }

    /// Continue a previous scan from its continuation cursor
    /// (the `gr:continuation` value of the earlier reply).
    pub fn with_continue_from(mut self, cursor: impl Into<String>) -> Self {
        self.continue_from = Some(cursor.into());
        self
    }

    /// How the reply payload should be decoded.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Query-string suffix (`?n=..&r=o&c=..`), empty when nothing is set.
    fn query(&self) -> String {
        let mut args = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        if let Some(count) = self.count {
            args.append_pair("n", &count.to_string());
            any = true;
        }
        if self.older_first {
            args.append_pair("r", "o");
            any = true;
        }
        if let Some(cursor) = &self.continue_from {
            args.append_pair("c", cursor);
            any = true;
        }
        if any {
            format!("?{}", args.finish())
        } else {
            String::new()
        }
    }
}

impl ReaderClient {
    /// Atom feed of any feed, subscribed or not.
    pub async fn feed_atom(&self, feed: &FeedId, options: &StreamOptions) -> Result<Atom> {
        let url = format!(
            "{}{}{}",
            self.service_root,
            GET_FEED_PREFIX,
            quote_plus(feed.url())
        );
        self.fetch_atom(url, options).await
    }

    /// Atom feed of unread items.
    pub async fn reading_list_atom(&self, options: &StreamOptions) -> Result<Atom> {
        self.in_state_atom("reading-list", options).await
    }

    /// Atom feed of recently read items.
    pub async fn read_atom(&self, options: &StreamOptions) -> Result<Atom> {
        self.in_state_atom("read", options).await
    }

    /// Atom feed of starred items.
    pub async fn starred_atom(&self, options: &StreamOptions) -> Result<Atom> {
        self.in_state_atom("starred", options).await
    }

    /// Atom feed of fresh (newly added) items.
    pub async fn fresh_atom(&self, options: &StreamOptions) -> Result<Atom> {
        self.in_state_atom("fresh", options).await
    }

    /// Atom feed of public (shared) items.
    pub async fn broadcast_atom(&self, options: &StreamOptions) -> Result<Atom> {
        self.in_state_atom("broadcast", options).await
    }

    /// Atom feed of items carrying the given tag.
    pub async fn tagged_atom(&self, tag: &Tag, options: &StreamOptions) -> Result<Atom> {
        let tag_id = self.tag_id(tag).await?;
        let url = format!(
            "{}{}{}",
            self.service_root,
            READING_TAG_PREFIX,
            quote_plus(&tag_id)
        );
        self.fetch_atom(url, options).await
    }

    /// Atom feed of items in any built-in state.
    ///
    /// Known states include: read, kept-unread, fresh, starred, broadcast,
    /// reading-list, tracking-body-link-used, tracking-emailed,
    /// tracking-item-link-used, tracking-kept-unread.
    pub async fn in_state_atom(&self, state: &str, options: &StreamOptions) -> Result<Atom> {
        let url = format!("{}{}{}", self.service_root, IN_STATE_PREFIX, state);
        self.fetch_atom(url, options).await
    }

    async fn fetch_atom(&self, base_url: String, options: &StreamOptions) -> Result<Atom> {
        let url = format!("{}{}", base_url, options.query());
        let body = self.call(&url).await?;
        atom::decode(body, options.format)
    }
}
