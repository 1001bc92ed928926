use crate::constants::SOURCE;
use crate::credential::SessionCredential;
use bytes::Bytes;
use greader_core::Result;
use http::{header, Method, Request};

/// Builds signed requests: client identifier plus the session credential.
///
/// No body means GET; a body is always a form-url-encoded POST.
#[derive(Debug, Clone)]
pub(crate) struct CallSigner {
    credential: SessionCredential,
}

impl CallSigner {
    pub(crate) fn new(credential: SessionCredential) -> Self {
        Self { credential }
    }

    /// Signed GET request.
    pub(crate) fn get(&self, url: &str) -> Result<Request<Bytes>> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(header::USER_AGENT, SOURCE)
            .header(
                header::AUTHORIZATION,
                format!("GoogleLogin auth={}", self.credential.as_str()),
            )
            .body(Bytes::new())?;
        Ok(req)
    }

    /// Signed POST request with a form-url-encoded body.
    ///
    /// Pairs keep their insertion order; values go through UTF-8 percent
    /// encoding as part of form serialization.
    pub(crate) fn post(&self, url: &str, params: &[(&str, &str)]) -> Result<Request<Bytes>> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(header::USER_AGENT, SOURCE)
            .header(
                header::AUTHORIZATION,
                format!("GoogleLogin auth={}", self.credential.as_str()),
            )
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Bytes::from(encode_form(params)))?;
        Ok(req)
    }
}

/// Form-url-encode a list of (key, value) pairs, preserving order.
pub(crate) fn encode_form(params: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Quote-plus encode a string for use inside a path segment.
///
/// The service expects urls and tag ids embedded in paths in the
/// `application/x-www-form-urlencoded` flavor (space as `+`, `/` escaped).
pub(crate) fn quote_plus(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
