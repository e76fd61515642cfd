//! Parser for the concurrent backend's sentinel-delimited output.
//!
//! The concurrent transport returns `CODE!!!BODY` for every completed response and
//! an `Error:`-prefixed message when the transfer failed. Output without a status
//! marker is read as a bare 200 body.

use super::types::ParsedResponse;

/// Separator between status code and body.
pub const STATUS_SENTINEL: &str = "!!!";

/// Prefixes marking a transfer failure (English and Russian transports).
pub const ERROR_PREFIXES: &[&str] = &["Error:", "Ошибка:"];

const DEFAULT_STATUS: u16 = 200;

/// Parses sentinel-delimited output into status and trimmed body.
///
/// When the text before the first `!!!` is not a status code the marker is treated
/// as part of the body.
pub fn parse_sentinel_response(raw: &str) -> ParsedResponse {
    if raw.is_empty() {
        return ParsedResponse::no_response();
    }

    if let Some((code, body)) = raw.split_once(STATUS_SENTINEL) {
        if let Ok(status) = code.trim().parse::<u16>() {
            return ParsedResponse::new(status, body.trim());
        }
    }

    if ERROR_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
        return ParsedResponse::new(0, raw.trim());
    }

    ParsedResponse::new(DEFAULT_STATUS, raw.trim())
}
