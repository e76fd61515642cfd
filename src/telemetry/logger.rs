//! Fire-and-forget transaction logger.

use std::sync::Arc;

use log::debug;
use tokio::task::JoinHandle;

use super::record::TransactionLogRecord;
use crate::config::{DEFAULT_TELEMETRY_ENDPOINT, LOG_PATH_SUFFIX, TELEMETRY_PATH_SUFFIX};
use crate::error_handling::{DegradedPath, InitializationError, RequestStats};
use crate::initialization::init_telemetry_client;

/// Derives the transaction collector URL from the session's general log host.
///
/// The first `/log` path segment becomes `/http-log`. Without a log host the local
/// default collector is used.
pub fn endpoint_from_log_host(log_host: Option<&str>) -> String {
    match log_host.map(str::trim).filter(|h| !h.is_empty()) {
        Some(host) if host.contains(TELEMETRY_PATH_SUFFIX) => host.to_string(),
        Some(host) => host.replacen(LOG_PATH_SUFFIX, TELEMETRY_PATH_SUFFIX, 1),
        None => DEFAULT_TELEMETRY_ENDPOINT.to_string(),
    }
}

/// Sends transaction records to the collector on detached tasks.
///
/// Delivery is attempted once. Failures are logged at debug level and counted,
/// never returned.
#[derive(Clone)]
pub struct TelemetryLogger {
    client: reqwest::Client,
    stats: Option<Arc<RequestStats>>,
}

impl TelemetryLogger {
    /// Logger with the default short-timeout client.
    pub fn new() -> Result<Self, InitializationError> {
        Ok(Self::with_client(init_telemetry_client()?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            stats: None,
        }
    }

    /// Counts delivery failures into `stats`.
    pub fn with_stats(mut self, stats: Arc<RequestStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Spawns the POST and returns immediately.
    ///
    /// Callers are not expected to await the handle; tests do, to observe delivery.
    pub fn log_transaction(&self, endpoint: String, record: TransactionLogRecord) -> JoinHandle<()> {
        let client = self.client.clone();
        let stats = self.stats.clone();

        tokio::spawn(async move {
            let result = client
                .post(&endpoint)
                .json(&record)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                Ok(_) => debug!("Delivered transaction record for {} to {endpoint}", record.url),
                Err(e) => {
                    debug!("Transaction record delivery to {endpoint} failed: {e}");
                    if let Some(stats) = stats {
                        stats.increment_degraded(DegradedPath::TelemetryDelivery);
                    }
                }
            }
        })
    }
}
