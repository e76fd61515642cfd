//! Request descriptor types.
//!
//! A [`RequestDescriptor`] is built once per call from the caller's arguments and
//! the session state, and is not mutated afterwards.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::cookie::Jar;
use serde::Serialize;
use strum_macros::{Display, EnumIter as EnumIterMacro, EnumString};

use super::headers::HeaderSet;

/// HTTP method of a call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIterMacro, ValueEnum,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether the method carries a request body.
    pub fn has_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Which layer supplied the cookies of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIterMacro, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CookieProvenance {
    /// No cookies: disabled by the caller, no active identity, or no jar available.
    None,
    /// Caller-supplied cookie string.
    ExplicitOverride,
    /// Blob cached in a session variable.
    CachedVariable,
    /// Blob decoded from the identity's persisted row (first read in the session).
    PersistedStore,
    /// The backend supplies cookies from the session-owned jar.
    TransportContainer,
}

/// Shape of the response the serialized backend returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseShape {
    /// Status line, header lines, blank line, body.
    #[default]
    HeaderAndBody,
    /// Body only.
    BodyOnly,
}

/// Fully resolved request, handed to a backend.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    /// Empty for GET and DELETE.
    pub body: String,
    /// Never contains transport-controlled names.
    pub headers: HeaderSet,
    /// `None` whenever provenance is [`CookieProvenance::TransportContainer`].
    pub cookies: Option<String>,
    pub cookie_provenance: CookieProvenance,
    /// Set only for transport-container provenance.
    pub cookie_jar: Option<Arc<Jar>>,
    /// Canonical `http://[user:pass@]host:port` or empty.
    pub proxy: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub content_type: String,
    pub response_shape: ResponseShape,
}

impl RequestDescriptor {
    /// Whether the backend should attach the session cookie jar.
    pub fn uses_cookie_jar(&self) -> bool {
        self.cookie_provenance == CookieProvenance::TransportContainer
    }
}
