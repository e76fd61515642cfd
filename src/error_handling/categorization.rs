//! Transport error categorization.
//!
//! Maps `reqwest::Error` values onto [`TransportErrorKind`] so backend failures
//! carry a stable category in logs and error strings.

use super::types::{BackendError, TransportErrorKind};

/// Categorizes a `reqwest::Error` into a [`TransportErrorKind`].
///
/// Order matters: a timeout during connect reports both `is_timeout` and
/// `is_connect`, and the deadline is the more useful signal.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportErrorKind {
    if error.is_builder() {
        TransportErrorKind::Builder
    } else if error.is_redirect() {
        TransportErrorKind::Redirect
    } else if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_request() {
        TransportErrorKind::Request
    } else if error.is_body() {
        TransportErrorKind::Body
    } else if error.is_decode() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Other
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        BackendError::Transport {
            kind: categorize_reqwest_error(&error),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_error_is_categorized() {
        // A URL without a scheme fails while building the request.
        let client = reqwest::Client::new();
        let err = client
            .get("not a url")
            .build()
            .expect_err("building should fail");
        assert_eq!(categorize_reqwest_error(&err), TransportErrorKind::Builder);

        let backend_err = BackendError::from(err);
        assert!(backend_err.to_string().starts_with("request builder error"));
    }

    #[tokio::test]
    async fn test_connect_error_is_categorized() {
        // Port 9 on localhost is closed in test environments.
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing listens on the discard port");
        assert_eq!(categorize_reqwest_error(&err), TransportErrorKind::Connect);
    }
}
