//! Response data types.

use chrono::{DateTime, Utc};

/// Canonical `(status, body)` pair. Status 0 means the backend returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status: u16,
    pub body: String,
}

impl ParsedResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn no_response() -> Self {
        Self::new(0, "")
    }
}

/// Result of one executed call.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Backend output as received.
    pub raw: String,
    pub status: u16,
    /// Trimmed body.
    pub body: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn new(
        raw: String,
        parsed: ParsedResponse,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            raw,
            status: parsed.status,
            body: parsed.body,
            started_at,
            finished_at,
        }
    }

    /// Wall-clock duration in milliseconds (never negative).
    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_ms() {
        let start = Utc::now();
        let result = ExecutionResult::new(
            "raw".to_string(),
            ParsedResponse::new(200, "raw"),
            start,
            start + Duration::milliseconds(1500),
        );
        assert_eq!(result.duration_ms(), 1500);
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "raw");
    }

    #[test]
    fn test_duration_clamps_clock_skew() {
        let start = Utc::now();
        let result = ExecutionResult::new(
            String::new(),
            ParsedResponse::no_response(),
            start,
            start - Duration::milliseconds(5),
        );
        assert_eq!(result.duration_ms(), 0);
    }
}
