//! HTTP header name constants.
//!
//! Transport-controlled names are owned by the network stack and are never forwarded
//! from caller-supplied header lists.

/// Header names stripped unconditionally by the header normalizer.
pub const TRANSPORT_CONTROLLED_HEADERS: &[&str] = &[
    "host",
    "connection",
    "proxy-connection",
    "content-length",
    "transfer-encoding",
    "expect",
    "upgrade",
    "te",
];

/// Header names Backend B refuses to forward (HTTP/2 pseudo headers without the
/// leading colon plus transport-controlled names).
pub const CONCURRENT_BACKEND_FORBIDDEN_HEADERS: &[&str] = &[
    "authority",
    "method",
    "path",
    "scheme",
    "host",
    "content-length",
    "connection",
    "upgrade",
    "proxy-connection",
    "transfer-encoding",
];

/// User-Agent header name.
pub const HEADER_USER_AGENT: &str = "user-agent";
/// Content-Type header name.
pub const HEADER_CONTENT_TYPE: &str = "content-type";
/// Cookie header name.
pub const HEADER_COOKIE: &str = "Cookie";

/// Returns true when `name` is in `list`, ignoring ASCII case.
pub fn header_in(list: &[&str], name: &str) -> bool {
    list.iter().any(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_in_ignores_case() {
        assert!(header_in(TRANSPORT_CONTROLLED_HEADERS, "Host"));
        assert!(header_in(TRANSPORT_CONTROLLED_HEADERS, "TRANSFER-ENCODING"));
        assert!(!header_in(TRANSPORT_CONTROLLED_HEADERS, "Accept"));
    }

    #[test]
    fn test_concurrent_backend_list_covers_pseudo_headers() {
        for name in ["authority", "method", "path", "scheme"] {
            assert!(header_in(CONCURRENT_BACKEND_FORBIDDEN_HEADERS, name));
        }
    }
}
