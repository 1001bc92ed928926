//! Subscription and tag management.

use crate::client::{decode_json, ReaderClient};
use crate::constants::{
    PREFERENCE_LIST_PATH, SOURCE, SUBSCRIPTION_EDIT_PATH, SUBSCRIPTION_LIST_PATH,
    SUBSCRIPTION_QUICKADD_PATH, TAG_DISABLE_PATH, TAG_LIST_PATH, UNREAD_COUNT_PATH,
};
use crate::items::cache_buster_query;
use crate::types::{FeedId, Subscription, SubscriptionList, Tag, TagList};
use greader_core::{Error, Result};
use serde_json::Value;

/// Output selection for the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    /// `?output=json`, decoded. The default.
    #[default]
    Parsed,
    /// `?output=json`, returned as bare text.
    Json,
    /// `?output=xml`, returned as bare text.
    Xml,
}

/// Reply of a list endpoint, per [`ListFormat`].
#[derive(Debug, Clone)]
pub enum ListReply {
    /// Decoded JSON document.
    Parsed(Value),
    /// Bare reply text (JSON or XML, as requested).
    Raw(String),
}

impl ListReply {
    /// The decoded document, if [`ListFormat::Parsed`] was requested.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ListReply::Parsed(value) => Some(value),
            ListReply::Raw(_) => None,
        }
    }

    /// The bare text, if a raw format was requested.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ListReply::Raw(text) => Some(text),
            ListReply::Parsed(_) => None,
        }
    }
}

impl ReaderClient {
    /// Info about all subscribed feeds.
    pub async fn subscription_list(&self, format: ListFormat) -> Result<ListReply> {
        self.list(SUBSCRIPTION_LIST_PATH, format).await
    }

    /// All tags known to the account.
    pub async fn tag_list(&self, format: ListFormat) -> Result<ListReply> {
        self.list(TAG_LIST_PATH, format).await
    }

    /// Account preferences.
    pub async fn preference_list(&self, format: ListFormat) -> Result<ListReply> {
        self.list(PREFERENCE_LIST_PATH, format).await
    }

    /// Unread counters per feed and tag.
    pub async fn unread_count(&self, format: ListFormat) -> Result<ListReply> {
        self.list(UNREAD_COUNT_PATH, format).await
    }

    /// Typed view of the subscription list.
    pub async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        let url = format!(
            "{}{}?output=json",
            self.service_root, SUBSCRIPTION_LIST_PATH
        );
        let body = self.call_text(&url).await?;
        let list: SubscriptionList = serde_json::from_str(&body).map_err(|e| {
            Error::operation_failed("subscription list reply is not valid JSON")
                .with_body(body)
                .with_source(e)
        })?;
        Ok(list.subscriptions)
    }

    /// Typed tag list, used by identity resolution.
    pub(crate) async fn fetch_tag_list(&self) -> Result<TagList> {
        let url = format!("{}{}?output=json", self.service_root, TAG_LIST_PATH);
        let body = self.call_text(&url).await?;
        serde_json::from_str(&body).map_err(|e| {
            Error::operation_failed("tag list reply is not valid JSON")
                .with_body(body)
                .with_source(e)
        })
    }

    async fn list(&self, path: &str, format: ListFormat) -> Result<ListReply> {
        let output = match format {
            ListFormat::Parsed | ListFormat::Json => "json",
            ListFormat::Xml => "xml",
        };
        let url = format!("{}{}?output={}", self.service_root, path, output);
        let body = self.call_text(&url).await?;
        match format {
            ListFormat::Parsed => Ok(ListReply::Parsed(decode_json(&body)?)),
            ListFormat::Json | ListFormat::Xml => Ok(ListReply::Raw(body)),
        }
    }

    /// Subscribe to a feed. The url must point at the RSS/Atom feed
    /// itself; see [`ReaderClient::subscribe_quickadd`] for autodetection
    /// from a site url.
    pub async fn subscribe_feed(&self, feed: &FeedId, title: Option<&str>) -> Result<()> {
        self.edit_subscription(feed, "subscribe", title, None, None)
            .await
    }

    /// Unsubscribe from a feed.
    pub async fn unsubscribe_feed(&self, feed: &FeedId) -> Result<()> {
        self.edit_subscription(feed, "unsubscribe", None, None, None)
            .await
    }

    /// Change a feed's title.
    pub async fn rename_feed(&self, feed: &FeedId, title: &str) -> Result<()> {
        self.edit_subscription(feed, "edit", Some(title), None, None)
            .await
    }

    /// Put a feed under a tag (folder). Not-yet-existing tags work.
    pub async fn add_feed_tag(&self, feed: &FeedId, title: &str, tag: &Tag) -> Result<()> {
        self.edit_subscription(feed, "edit", Some(title), Some(tag), None)
            .await
    }

    /// Take a feed out of a tag (folder).
    pub async fn remove_feed_tag(&self, feed: &FeedId, title: &str, tag: &Tag) -> Result<()> {
        self.edit_subscription(feed, "edit", Some(title), None, Some(tag))
            .await
    }

    /// Remove a tag as a whole.
    pub async fn disable_tag(&self, tag: &Tag) -> Result<()> {
        let url = format!(
            "{}{}?client={}",
            self.service_root, TAG_DISABLE_PATH, SOURCE
        );
        let tag_id = self.tag_id(tag).await?;
        let token = self.action_token().await?;
        let params = [
            ("s", tag_id.as_str()),
            ("ac", "disable-tags"),
            ("T", token.as_str()),
        ];
        self.expect_ok(&url, &params).await
    }

    /// Subscribe to a site url, letting the service autodetect the feed.
    ///
    /// Returns the reply document; `numResults` is 0 when no feed was
    /// found, otherwise `streamId` names the subscribed feed.
    pub async fn subscribe_quickadd(&self, site_url: &str) -> Result<Value> {
        let url = format!(
            "{}{}?{}",
            self.service_root,
            SUBSCRIPTION_QUICKADD_PATH,
            cache_buster_query()
        );
        let token = self.action_token().await?;
        let params = [("quickadd", site_url), ("T", token.as_str())];
        let body = self.call_form_text(&url, &params).await?;
        decode_json(&body)
    }

    /// Token-protected subscription edit. Every variant of the edit
    /// endpoint demands the literal reply `OK`.
    async fn edit_subscription(
        &self,
        feed: &FeedId,
        operation: &str,
        title: Option<&str>,
        add_tag: Option<&Tag>,
        remove_tag: Option<&Tag>,
    ) -> Result<()> {
        let url = format!(
            "{}{}?client={}",
            self.service_root, SUBSCRIPTION_EDIT_PATH, SOURCE
        );
        let token = self.action_token().await?;

        let mut params: Vec<(&str, String)> = vec![
            ("ac", operation.to_string()),
            ("s", feed.as_str().to_string()),
            ("T", token),
        ];
        if let Some(title) = title {
            params.push(("t", title.to_string()));
        }
        if let Some(tag) = add_tag {
            params.push(("a", self.tag_id(tag).await?));
        }
        if let Some(tag) = remove_tag {
            params.push(("r", self.tag_id(tag).await?));
        }

        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.expect_ok(&url, &borrowed).await
    }

    async fn expect_ok(&self, url: &str, params: &[(&str, &str)]) -> Result<()> {
        let reply = self.call_form_text(url, params).await?;
        if reply != "OK" {
            return Err(Error::operation_failed("service rejected the edit").with_body(reply));
        }
        Ok(())
    }
}
