//! Request outcome statistics.
//!
//! Thread-safe counters for call outcomes (by status class) and for degraded
//! resolution paths, shared across concurrent calls through `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::status::StatusClass;
use super::types::DegradedPath;

/// Thread-safe request statistics tracker.
///
/// Every [`StatusClass`] and [`DegradedPath`] is initialized to zero on creation,
/// so lookups never miss.
pub struct RequestStats {
    outcomes: HashMap<StatusClass, AtomicUsize>,
    degraded: HashMap<DegradedPath, AtomicUsize>,
}

impl RequestStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for class in StatusClass::iter() {
            outcomes.insert(class, AtomicUsize::new(0));
        }

        let mut degraded = HashMap::new();
        for path in DegradedPath::iter() {
            degraded.insert(path, AtomicUsize::new(0));
        }

        RequestStats { outcomes, degraded }
    }

    /// Increment the counter of an outcome class.
    pub fn increment_outcome(&self, class: StatusClass) {
        if let Some(counter) = self.outcomes.get(&class) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("Outcome class {:?} missing from RequestStats", class);
        }
    }

    /// Increment the counter of a degraded path.
    pub fn increment_degraded(&self, path: DegradedPath) {
        if let Some(counter) = self.degraded.get(&path) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("Degraded path {:?} missing from RequestStats", path);
        }
    }

    /// Get the count for an outcome class.
    pub fn get_outcome_count(&self, class: StatusClass) -> usize {
        self.outcomes
            .get(&class)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a degraded path.
    pub fn get_degraded_count(&self, path: DegradedPath) -> usize {
        self.degraded
            .get(&path)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total completed or aborted calls.
    pub fn total_calls(&self) -> usize {
        StatusClass::iter().map(|c| self.get_outcome_count(c)).sum()
    }

    /// Total calls whose outcome was not a success.
    pub fn total_failures(&self) -> usize {
        StatusClass::iter()
            .filter(|c| *c != StatusClass::Success)
            .map(|c| self.get_outcome_count(c))
            .sum()
    }

    /// Total degraded resolution events.
    pub fn total_degraded(&self) -> usize {
        DegradedPath::iter()
            .map(|p| self.get_degraded_count(p))
            .sum()
    }

    /// Logs non-zero counters at debug level.
    pub fn log_summary(&self) {
        for class in StatusClass::iter() {
            let count = self.get_outcome_count(class);
            if count > 0 {
                log::debug!("{}: {}", class, count);
            }
        }
        for path in DegradedPath::iter() {
            let count = self.get_degraded_count(path);
            if count > 0 {
                log::debug!("degraded {}: {}", path, count);
            }
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}
