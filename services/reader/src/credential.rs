use chrono::TimeDelta;
use greader_core::time::{now, DateTime};
use greader_core::Redact;
use std::fmt::{self, Debug};

/// Session credential obtained from the ClientLogin handshake.
///
/// Attached to every authenticated request as
/// `Authorization: GoogleLogin auth=<credential>`. Immutable for the
/// client's lifetime; once the service stops accepting it, a fresh client
/// has to be constructed.
#[derive(Clone)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionCredential")
            .field(&Redact::from(&self.0))
            .finish()
    }
}

/// Short-lived anti-forgery token required on state-mutating calls.
///
/// Validity is decided purely by comparing the acquisition timestamp
/// against the window, never by trusting a previous success.
#[derive(Clone)]
pub(crate) struct ActionToken {
    value: String,
    acquired_at: DateTime,
}

impl ActionToken {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            acquired_at: now(),
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn is_valid(&self, window: TimeDelta) -> bool {
        now() - self.acquired_at <= window
    }
}

impl Debug for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionToken")
            .field("value", &Redact::from(&self.value))
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}
