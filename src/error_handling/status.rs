//! HTTP status classification.
//!
//! Maps status codes to human text and decides whether a call counts as a success.
//! Status 0 is reserved for transport failures.

use strum_macros::{Display, EnumIter as EnumIterMacro};

use crate::config::ERROR_BODY_PREVIEW_CHARS;

/// Coarse outcome class of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Display)]
pub enum StatusClass {
    #[strum(to_string = "success")]
    Success,
    #[strum(to_string = "connection failed")]
    ConnectionFailed,
    #[strum(to_string = "rate limited")]
    RateLimited,
    #[strum(to_string = "client error")]
    ClientError,
    #[strum(to_string = "server error")]
    ServerError,
    #[strum(to_string = "unknown")]
    Unknown,
}

/// Returns true iff `200 <= status < 300`.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classifies a status code.
pub fn classify(status: u16) -> StatusClass {
    match status {
        0 => StatusClass::ConnectionFailed,
        s if is_success(s) => StatusClass::Success,
        429 => StatusClass::RateLimited,
        400..=499 => StatusClass::ClientError,
        s if s >= 500 => StatusClass::ServerError,
        _ => StatusClass::Unknown,
    }
}

/// Human-readable text for a status code.
///
/// Listed codes get their reason phrase; the rest fall back to their range.
pub fn status_text(status: u16) -> &'static str {
    match status {
        0 => "Connection Failed",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        400..=499 => "Client Error",
        s if s >= 500 => "Server Error",
        _ => "Unknown Error",
    }
}

/// Formats the error string returned (or raised) for a failed call.
///
/// `"{code} {text}: {preview}"`, where the preview is the first
/// [`ERROR_BODY_PREVIEW_CHARS`] characters of the body followed by `...` when cut.
/// The body segment is omitted when the body is blank.
pub fn format_error_message(status: u16, body: &str) -> String {
    let text = status_text(status);
    if body.trim().is_empty() {
        return format!("{status} {text}");
    }

    let mut chars = body.chars();
    let preview: String = chars.by_ref().take(ERROR_BODY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{status} {text}: {preview}...")
    } else {
        format!("{status} {text}: {preview}")
    }
}
