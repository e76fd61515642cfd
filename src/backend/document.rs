//! Wire transport for the serialized backend.
//!
//! Follows up to [`MAX_REDIRECT_HOPS`] redirects, attaches the session cookie jar for
//! transport-container calls and renders the final response as a pseudo-HTTP
//! document (or the body alone for [`ResponseShape::BodyOnly`]).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Version};

use super::{apply_headers, Transport};
use crate::config::MAX_REDIRECT_HOPS;
use crate::error_handling::BackendError;
use crate::initialization::build_transport_client;
use crate::request::{RequestDescriptor, ResponseShape};

pub struct DocumentTransport;

#[async_trait]
impl Transport for DocumentTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<String, BackendError> {
        let jar = if request.uses_cookie_jar() {
            request.cookie_jar.clone()
        } else {
            None
        };
        let client = build_transport_client(request, Policy::limited(MAX_REDIRECT_HOPS), jar)?;

        let mut builder = apply_headers(
            client.request(request.method.into(), &request.url),
            request.headers.iter(),
        );
        if let Some(cookies) = &request.cookies {
            builder = builder.header(COOKIE, cookies);
        }
        if request.method.has_body() {
            builder = builder
                .header(CONTENT_TYPE, &request.content_type)
                .body(request.body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(match request.response_shape {
            ResponseShape::BodyOnly => body,
            ResponseShape::HeaderAndBody => render_document(version, status, &headers, &body),
        })
    }

    fn supports_cookie_jar(&self) -> bool {
        true
    }
}

/// Renders `VERSION CODE REASON\r\n<headers>\r\n\r\n<body>`.
pub(crate) fn render_document(
    version: Version,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> String {
    let mut doc = format!(
        "{:?} {} {}\r\n",
        version,
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );
    for (name, value) in headers {
        doc.push_str(name.as_str());
        doc.push_str(": ");
        doc.push_str(&String::from_utf8_lossy(value.as_bytes()));
        doc.push_str("\r\n");
    }
    doc.push_str("\r\n");
    doc.push_str(body);
    doc
}
