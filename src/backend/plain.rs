//! Wire transport for the concurrent backend.
//!
//! Output convention: `CODE!!!BODY` for every completed response, 2xx included, and
//! `Error: <message>` when the transfer fails after the client was built. It has no
//! cookie jar; resolved cookies travel in a `Cookie` header.

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;

use super::{apply_headers, Transport};
use crate::config::{header_in, CONCURRENT_BACKEND_FORBIDDEN_HEADERS, HEADER_COOKIE};
use crate::error_handling::BackendError;
use crate::initialization::build_transport_client;
use crate::request::RequestDescriptor;
use crate::response::STATUS_SENTINEL;

pub struct PlainTransport;

#[async_trait]
impl Transport for PlainTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<String, BackendError> {
        let client = build_transport_client(request, reqwest::redirect::Policy::default(), None)?;

        let mut lines: Vec<(String, String)> = request
            .headers
            .iter()
            .filter(|(name, _)| !header_in(CONCURRENT_BACKEND_FORBIDDEN_HEADERS, name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        fold_cookie_header(&mut lines, request.cookies.as_deref());

        let mut builder = apply_headers(
            client.request(request.method.into(), &request.url),
            lines.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        );
        if request.method.has_body() {
            builder = builder
                .header(CONTENT_TYPE, &request.content_type)
                .body(request.body.clone());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Concurrent transport failed for {}: {e}", request.url);
                return Ok(format!("Error: {e}"));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(format!("Error: {e}")),
        };

        Ok(format!("{}{STATUS_SENTINEL}{body}", status.as_u16()))
    }
}

/// Appends the resolved cookie string as a `Cookie` header.
///
/// Trailing `;` and spaces are trimmed. An existing `Cookie` line (any case) wins.
pub fn fold_cookie_header(lines: &mut Vec<(String, String)>, cookies: Option<&str>) {
    let Some(cookies) = cookies else {
        return;
    };
    let cookies = cookies.trim_end_matches([';', ' ']);
    if cookies.is_empty() || lines.iter().any(|(name, _)| name.eq_ignore_ascii_case(HEADER_COOKIE)) {
        return;
    }
    lines.push((HEADER_COOKIE.to_string(), cookies.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_cookie_trims_trailing_separator() {
        let mut lines = vec![("Accept".to_string(), "*/*".to_string())];
        fold_cookie_header(&mut lines, Some("sid=abc; api=1; "));
        assert_eq!(
            lines.last(),
            Some(&("Cookie".to_string(), "sid=abc; api=1".to_string()))
        );
    }

    #[test]
    fn test_existing_cookie_header_wins() {
        let mut lines = vec![("cookie".to_string(), "manual=1".to_string())];
        fold_cookie_header(&mut lines, Some("sid=abc;"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, "manual=1");
    }

    #[test]
    fn test_no_cookies_no_header() {
        let mut lines = Vec::new();
        fold_cookie_header(&mut lines, None);
        fold_cookie_header(&mut lines, Some(" ;"));
        assert!(lines.is_empty());
    }
}
