//! Parser for the serialized backend's pseudo-HTTP documents.
//!
//! Shape: `VERSION CODE REASON\r\n<header lines>\r\n\r\n<body>`. Ambiguous framing
//! defaults to status 200; only an empty document means "no response" (status 0).

use super::types::ParsedResponse;

const LINE_BREAK: &str = "\r\n";
const HEADER_TERMINATOR: &str = "\r\n\r\n";
const DEFAULT_STATUS: u16 = 200;

/// Parses a pseudo-HTTP document into status and trimmed body.
pub fn parse_http_document(raw: &str) -> ParsedResponse {
    if raw.is_empty() {
        return ParsedResponse::no_response();
    }

    let Some((head, body)) = raw.split_once(HEADER_TERMINATOR) else {
        return ParsedResponse::new(DEFAULT_STATUS, raw.trim());
    };

    let status_line = head.split(LINE_BREAK).next().unwrap_or_default();
    let status = status_line
        .split(' ')
        .nth(1)
        .and_then(|code| code.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_STATUS);

    ParsedResponse::new(status, body.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_document() {
        let raw = "HTTP/1.1 429 Too Many Requests\r\nRetry-After: 2\r\n\r\n{\"err\":\"rate\"}";
        let parsed = parse_http_document(raw);
        assert_eq!(parsed.status, 429);
        assert_eq!(parsed.body, r#"{"err":"rate"}"#);
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse_http_document("");
        assert_eq!(parsed.status, 0);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_no_blank_line_is_all_body() {
        let parsed = parse_http_document("  just some text\r\nsecond line ");
        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.body, "just some text\r\nsecond line");
    }

    #[test]
    fn test_unparsable_code_defaults_to_200() {
        let parsed = parse_http_document("HTTP/1.1 abc Weird\r\n\r\nbody");
        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.body, "body");

        let parsed = parse_http_document("HTTP/1.1\r\n\r\nbody");
        assert_eq!(parsed.status, 200);
    }

    #[test]
    fn test_out_of_range_code_defaults_to_200() {
        let parsed = parse_http_document("HTTP/1.1 70000 Huge\r\n\r\n");
        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_body_keeps_inner_blank_lines() {
        let raw = "HTTP/1.1 200 OK\r\nA: b\r\n\r\nfirst\r\n\r\nsecond\r\n";
        let parsed = parse_http_document(raw);
        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.body, "first\r\n\r\nsecond");
    }

    #[test]
    fn test_status_only_document() {
        let parsed = parse_http_document("HTTP/1.1 204 No Content\r\n\r\n");
        assert_eq!(parsed.status, 204);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        for raw in [
            "",
            "plain",
            "HTTP/1.1 503 Service Unavailable\r\n\r\n down ",
            "HTTP/2 404\r\nx: y\r\n\r\n",
        ] {
            assert_eq!(parse_http_document(raw), parse_http_document(raw));
        }
    }
}
