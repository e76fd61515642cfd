//! Response parsing.
//!
//! Each backend frames its output differently, so each has its own parser. The
//! two are deliberately kept apart: their defaults on ambiguous input differ.
//! Neither can fail; malformed framing resolves to safe defaults.

mod document;
mod sentinel;
mod types;

pub use document::parse_http_document;
pub use sentinel::{parse_sentinel_response, ERROR_PREFIXES, STATUS_SENTINEL};
pub use types::{ExecutionResult, ParsedResponse};

use crate::backend::BackendKind;

/// Parses raw backend output with the parser matching the backend that produced it.
pub fn parse_raw(kind: BackendKind, raw: &str) -> ParsedResponse {
    match kind {
        BackendKind::Serialized => parse_http_document(raw),
        BackendKind::Concurrent => parse_sentinel_response(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_backend() {
        let raw = "404!!!gone";
        assert_eq!(parse_raw(BackendKind::Concurrent, raw).status, 404);
        // Same text is an unframed body for the serialized backend.
        assert_eq!(parse_raw(BackendKind::Serialized, raw).status, 200);
    }

    #[test]
    fn test_empty_blob_is_connection_failure_for_both() {
        for kind in [BackendKind::Serialized, BackendKind::Concurrent] {
            let parsed = parse_raw(kind, "");
            assert_eq!(parsed.status, 0);
            assert_eq!(crate::error_handling::status_text(parsed.status), "Connection Failed");
        }
    }
}
