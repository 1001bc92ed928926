//! Decoding of Atom replies.

use crate::client::trim_log;
use bytes::Bytes;
use greader_core::{Error, Result};
use log::error;

/// How an Atom reply should be decoded.
///
/// Controls only the decoding of the payload, never the request itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Verbatim XML text.
    Raw,
    /// Generic element tree (maps of child elements, `@` attributes and
    /// `$text` nodes), for callers poking at extension elements such as
    /// the continuation cursor.
    Tree,
    /// Structured feed model. The default.
    #[default]
    Parsed,
}

/// A decoded Atom reply, one variant per [`Format`].
#[derive(Debug, Clone)]
pub enum Atom {
    /// Verbatim XML text.
    Raw(String),
    /// Generic element tree.
    Tree(serde_json::Value),
    /// Structured feed model.
    Parsed(Box<feed_rs::model::Feed>),
}

impl Atom {
    /// The raw text, if decoded with [`Format::Raw`].
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Atom::Raw(text) => Some(text),
            _ => None,
        }
    }

    /// The element tree, if decoded with [`Format::Tree`].
    pub fn as_tree(&self) -> Option<&serde_json::Value> {
        match self {
            Atom::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// The feed model, if decoded with [`Format::Parsed`].
    pub fn as_feed(&self) -> Option<&feed_rs::model::Feed> {
        match self {
            Atom::Parsed(feed) => Some(feed),
            _ => None,
        }
    }
}

/// Decode an Atom reply body according to the requested format.
///
/// A body that fails to parse where structure was expected becomes an
/// operation failure carrying the raw body; the body is also logged for
/// operator troubleshooting.
pub(crate) fn decode(body: Bytes, format: Format) -> Result<Atom> {
    match format {
        Format::Raw => Ok(Atom::Raw(String::from_utf8(body.to_vec())?)),
        Format::Tree => {
            let text = String::from_utf8(body.to_vec())?;
            match quick_xml::de::from_str::<serde_json::Value>(&text) {
                Ok(tree) => Ok(Atom::Tree(tree)),
                Err(e) => {
                    error!("unparseable atom reply: {}", trim_log(&text));
                    Err(Error::operation_failed("atom reply is not well-formed XML")
                        .with_body(text)
                        .with_source(e))
                }
            }
        }
        Format::Parsed => match feed_rs::parser::parse(body.as_ref()) {
            Ok(feed) => Ok(Atom::Parsed(Box::new(feed))),
            Err(e) => {
                let text = String::from_utf8_lossy(&body).into_owned();
                error!("unparseable atom reply: {}", trim_log(&text));
                Err(Error::operation_failed("atom reply is not a parseable feed")
                    .with_body(text)
                    .with_source(e))
            }
        },
    }
}
