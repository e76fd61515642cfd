//! Request descriptor construction.
//!
//! This module provides the resolution steps that turn caller arguments and
//! session state into a [`RequestDescriptor`]:
//! - header normalization (dedup, denylist, identity fields)
//! - proxy token resolution and credential masking
//! - layered cookie resolution with domain matching

mod cookies;
mod descriptor;
mod headers;
mod proxy;

pub use cookies::{cookie_header_for_host, domain_matches, resolve_cookies, CookieResolution};
pub use descriptor::{CookieProvenance, Method, RequestDescriptor, ResponseShape};
pub use headers::{normalize_headers, parse_header_line, HeaderSet, NormalizedHeaders};
pub use proxy::{
    mask_proxy_credentials, parse_proxy, resolve_proxy, ProxyParseError, ResolvedProxy,
};
