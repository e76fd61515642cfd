//! Error handling, status classification and request statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, store, backend, caller-visible)
//! - The status classifier (status text, success test, error message format)
//! - Categorization of reqwest transport errors
//! - Thread-safe outcome and degradation counters
//!
//! Only transport faults and HTTP error statuses are caller-visible; every other
//! failure degrades locally and is counted as a [`DegradedPath`].

mod categorization;
mod stats;
mod status;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::RequestStats;
pub use status::{classify, format_error_message, is_success, status_text, StatusClass};
pub use types::{
    BackendError, DegradedPath, InitializationError, RequestError, StoreError,
    TransportErrorKind,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_request_stats_initialization() {
        let stats = RequestStats::new();
        for class in StatusClass::iter() {
            assert_eq!(stats.get_outcome_count(class), 0);
        }
        for path in DegradedPath::iter() {
            assert_eq!(stats.get_degraded_count(path), 0);
        }
    }

    #[test]
    fn test_request_stats_increment() {
        let stats = RequestStats::new();
        stats.increment_outcome(StatusClass::Success);
        stats.increment_outcome(StatusClass::RateLimited);
        stats.increment_outcome(StatusClass::RateLimited);
        stats.increment_degraded(DegradedPath::ProxyParse);

        assert_eq!(stats.get_outcome_count(StatusClass::Success), 1);
        assert_eq!(stats.get_outcome_count(StatusClass::RateLimited), 2);
        assert_eq!(stats.total_calls(), 3);
        assert_eq!(stats.total_failures(), 2);
        assert_eq!(stats.total_degraded(), 1);
    }

    #[test]
    fn test_request_stats_concurrent_increments() {
        let stats = std::sync::Arc::new(RequestStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_outcome(StatusClass::ServerError);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.get_outcome_count(StatusClass::ServerError), 800);
    }
}
