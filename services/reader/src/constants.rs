//! Service endpoints and protocol constants.

/// Client identifier, sent as `User-Agent` header and `client` query param.
pub(crate) const SOURCE: &str = "mekk.reader_client";

/// Default service root for API and atom calls.
pub(crate) const SERVICE_ROOT: &str = "http://www.google.com";
/// Default root of the login endpoint. Login always goes over TLS.
pub(crate) const LOGIN_ROOT: &str = "https://www.google.com";

pub(crate) const LOGIN_PATH: &str = "/accounts/ClientLogin";
pub(crate) const TOKEN_PATH: &str = "/reader/api/0/token";

pub(crate) const TAG_LIST_PATH: &str = "/reader/api/0/tag/list";
pub(crate) const PREFERENCE_LIST_PATH: &str = "/reader/api/0/preference/list";
pub(crate) const UNREAD_COUNT_PATH: &str = "/reader/api/0/unread-count";
pub(crate) const SUBSCRIPTION_LIST_PATH: &str = "/reader/api/0/subscription/list";

pub(crate) const SUBSCRIPTION_EDIT_PATH: &str = "/reader/api/0/subscription/edit";
pub(crate) const SUBSCRIPTION_QUICKADD_PATH: &str = "/reader/api/0/subscription/quickadd";
pub(crate) const TAG_DISABLE_PATH: &str = "/reader/api/0/disable-tag";

pub(crate) const SEARCH_ITEMS_IDS_PATH: &str = "/reader/api/0/search/items/ids";
pub(crate) const STREAM_ITEMS_CONTENTS_PATH: &str = "/reader/api/0/stream/items/contents";
/// Completed with a quote-plus encoded tag id.
pub(crate) const STREAM_CONTENTS_PREFIX: &str = "/reader/api/0/stream/contents/";
/// Completed with a quote-plus encoded feed url.
pub(crate) const STREAM_CONTENTS_FEED_PREFIX: &str = "/reader/api/0/stream/contents/feed/";

/// Completed with a built-in state name (read, starred, fresh, ...).
pub(crate) const IN_STATE_PREFIX: &str = "/reader/atom/user/-/state/com.google/";
/// Completed with a quote-plus encoded feed url.
pub(crate) const GET_FEED_PREFIX: &str = "/reader/atom/feed/";
/// Completed with a quote-plus encoded tag id.
pub(crate) const READING_TAG_PREFIX: &str = "/reader/atom/";

/// How long an action token stays usable after acquisition.
pub(crate) const TOKEN_VALID_SECS: i64 = 60;

/// Log lines quoting request params or reply bodies are trimmed to this.
pub(crate) const TRIM_LOG_MESSAGES_AT: usize = 100;
