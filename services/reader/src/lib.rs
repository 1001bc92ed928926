//! Google Reader protocol client.
//!
//! Connects to a Reader account and retrieves or modifies subscriptions,
//! tags and articles. The heart of the crate is the authentication
//! plumbing: the ClientLogin handshake yields a session credential, a
//! short-lived action token protects every mutating call, and both are
//! attached to outbound requests by the call signer.
//!
//! The `*_atom` functions retrieve article listings as Atom feeds. Apart
//! from operation-specific parameters they all take [`StreamOptions`]:
//! item count, scan direction, a continuation cursor for paging, and the
//! decode format of the reply.
//!
//! ## Example
//!
//! ```no_run
//! use greader::{ReaderClient, StreamOptions};
//! use greader_core::Context;
//! use greader_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> greader_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let client = ReaderClient::login(ctx, "joe@example.com", "secret").await?;
//!
//! let unread = client
//!     .reading_list_atom(&StreamOptions::new().with_count(50))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod constants;

mod credential;
pub use credential::SessionCredential;

mod types;
pub use types::{FeedId, ItemId, Subscription, SubscriptionList, Tag, TagEntry, TagList};

mod atom;
pub use atom::{Atom, Format};

mod client;
pub use client::{Builder, ReaderClient};

mod session;
mod signer;
mod token;

mod identity;
mod items;
mod streams;
pub use streams::StreamOptions;
mod subscriptions;
pub use subscriptions::{ListFormat, ListReply};

pub use greader_core::{Context, Error, ErrorKind, HttpSend, Result};
