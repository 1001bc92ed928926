//! ClientLogin handshake.

use crate::constants::{LOGIN_PATH, SOURCE};
use crate::credential::SessionCredential;
use crate::signer::encode_form;
use bytes::Bytes;
use greader_core::{Context, Error, Redact, Result};
use http::{header, Method, Request, StatusCode};
use log::{debug, info};

/// Perform the login handshake and extract the session credential.
///
/// A 403 reply means the account rejected us; any other non-success status
/// is a transport failure. A success reply must contain an `Auth=<token>`
/// field, otherwise the login counts as failed too.
pub(crate) async fn obtain_session(
    ctx: &Context,
    login_root: &str,
    service_root: &str,
    email: &str,
    password: &str,
) -> Result<SessionCredential> {
    let url = format!("{login_root}{LOGIN_PATH}");
    let body = encode_form(&[
        ("Email", email),
        ("Passwd", password),
        ("service", "reader"),
        ("source", SOURCE),
        ("continue", service_root),
    ]);

    info!(
        "calling {url} for {email} (password {:?})",
        Redact::from(password)
    );

    let req = Request::builder()
        .method(Method::POST)
        .uri(&url)
        .header(header::USER_AGENT, SOURCE)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Bytes::from(body))?;

    let resp = ctx.http_send(req).await?;
    let status = resp.status();
    if status == StatusCode::FORBIDDEN {
        return Err(Error::authentication_failed("login rejected by service")
            .with_status(status)
            .with_body(String::from_utf8_lossy(resp.body()).into_owned()));
    }
    if !status.is_success() {
        return Err(
            Error::transport_failed(format!("login endpoint replied with status {status}"))
                .with_status(status)
                .with_body(String::from_utf8_lossy(resp.body()).into_owned()),
        );
    }

    let text = String::from_utf8_lossy(resp.body());
    let auth = extract_auth(&text).ok_or_else(|| {
        Error::authentication_failed("login reply carries no Auth field")
    })?;
    debug!("login succeeded for {email}");
    Ok(SessionCredential::new(auth))
}

/// Pull the value of the first `Auth=<token>` field out of the login reply.
fn extract_auth(body: &str) -> Option<String> {
    let rest = body.split("Auth=").nth(1)?;
    let token: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_auth() {
        let body = "SID=abc\nLSID=def\nAuth=XYZ123\n";
        assert_eq!(extract_auth(body).as_deref(), Some("XYZ123"));
    }

    #[test]
    fn test_extract_auth_missing_or_empty() {
        assert_eq!(extract_auth("SID=abc\nLSID=def\n"), None);
        assert_eq!(extract_auth("Auth=\nmore"), None);
    }
}
