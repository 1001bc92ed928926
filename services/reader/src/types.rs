//! Identifier types of the Reader protocol.
//!
//! The service accepts several identifiers in two spellings each: a tag is
//! either a bare name or a qualified `user/<id>/label/<name>` id, a feed is
//! a url with or without the `feed/` prefix, an article id is either a
//! short numeric string or the long `tag:...` form. Each pair is modeled
//! as its own type so the sniffing happens once, at the API boundary.

use serde::Deserialize;

/// A tag (label/folder), referenced by name or by qualified id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Human-readable name, e.g. `Life: Politics`. Resolved against the
    /// account id before use.
    Name(String),
    /// Fully qualified id, e.g. `user/12345/label/Life: Politics`.
    /// Used as-is.
    Id(String),
}

impl Tag {
    /// Classify an input string by its `user/` prefix.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("user/") {
            Tag::Id(value)
        } else {
            Tag::Name(value)
        }
    }

    /// The underlying string, whichever form it is.
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Name(s) | Tag::Id(s) => s,
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::new(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::new(value)
    }
}

/// Canonical identifier of a subscribable feed: `feed/<url>`.
///
/// The constructor inserts the prefix when the caller supplies a bare url,
/// so both spellings end up as the same canonical value (and the same
/// cache key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    /// Normalize a feed url or a prefixed feed id.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("feed/") {
            FeedId(value)
        } else {
            FeedId(format!("feed/{value}"))
        }
    }

    /// Canonical form, always carrying the `feed/` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare feed url, prefix stripped.
    pub fn url(&self) -> &str {
        &self.0["feed/".len()..]
    }
}

impl From<&str> for FeedId {
    fn from(value: &str) -> Self {
        FeedId::new(value)
    }
}

impl From<String> for FeedId {
    fn from(value: String) -> Self {
        FeedId::new(value)
    }
}

/// An article identifier, short or long form.
///
/// Both forms are valid wherever an item id is consumed; they are
/// transmitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemId {
    /// Short numeric (possibly negative) form, e.g. `-8654279325215116158`.
    Short(String),
    /// Long qualified form, e.g. `tag:google.com,2005:reader/item/5d0cfa30041d4348`.
    Long(String),
}

impl ItemId {
    /// Classify an input string by its `tag:` prefix.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("tag:") {
            ItemId::Long(value)
        } else {
            ItemId::Short(value)
        }
    }

    /// The underlying string, whichever form it is.
    pub fn as_str(&self) -> &str {
        match self {
            ItemId::Short(s) | ItemId::Long(s) => s,
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId::new(value)
    }
}

/// Parsed view of the tag-list reply, enough for identity resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    /// All tags known to the account.
    pub tags: Vec<TagEntry>,
}

/// One entry of the tag list.
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    /// Qualified tag id, e.g. `user/12345/label/News`.
    pub id: String,
    /// Service-assigned sort key.
    #[serde(default)]
    pub sortid: Option<String>,
}

/// Parsed view of the subscription-list reply.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionList {
    /// All subscribed feeds.
    pub subscriptions: Vec<Subscription>,
}

/// One subscribed feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Canonical feed id (`feed/<url>`).
    pub id: String,
    /// Feed title as shown in the reader.
    #[serde(default)]
    pub title: Option<String>,
}

/// Extract the numeric account id out of a qualified tag id.
///
/// Matches ids of the shape `user/<digits>/...`.
pub(crate) fn account_id_of(tag_id: &str) -> Option<&str> {
    let rest = tag_id.strip_prefix("user/")?;
    let (id, _) = rest.split_once('/')?;
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}
