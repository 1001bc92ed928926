//! Core components shared by the greader client crates.
//!
//! This crate provides the transport-neutral foundation the Reader client
//! is built on:
//!
//! - **Context**: a container holding the HTTP sending implementation; the
//!   single chokepoint through which every network request travels
//! - **HttpSend**: the trait an HTTP backend implements (or a test double)
//! - **Error**: the error type shared across the workspace
//!
//! ## Example
//!
//! ```no_run
//! use greader_core::{Context, HttpSend};
//! use async_trait::async_trait;
//! use bytes::Bytes;
//!
//! #[derive(Debug)]
//! struct MyHttpClient;
//!
//! #[async_trait]
//! impl HttpSend for MyHttpClient {
//!     async fn http_send(&self, req: http::Request<Bytes>) -> anyhow::Result<http::Response<Bytes>> {
//!         // issue the request with the HTTP client of your choice
//!         todo!()
//!     }
//! }
//!
//! let ctx = Context::new().with_http_send(MyHttpClient);
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;

mod context;
pub use context::{Context, HttpSend, NoopHttpSend};

mod error;
pub use error::{Error, ErrorKind, Result};

mod redact;
pub use redact::Redact;
