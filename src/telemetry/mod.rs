//! Transaction telemetry.
//!
//! One record per completed call is POSTed to a collector as JSON. Records are
//! never persisted or retried, and delivery never affects the caller's result.

mod logger;
mod record;

pub use logger::{endpoint_from_log_host, TelemetryLogger};
pub use record::{machine_name, Origin, RequestSection, ResponseSection, TransactionLogRecord};
