// Shared test helpers for session setup and requester construction.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use session_http::config::{
    COLUMN_COOKIES, IDENTITY_KEY_COLUMN, IDENTITY_TABLE, VAR_ACCOUNT, VAR_LOG_HOST,
};
use session_http::session::RowKey;
use session_http::telemetry::TelemetryLogger;
use session_http::{Backends, MemorySessionStore, NetworkIdentity, Requester, SessionStore};

/// Account id used by every test session.
#[allow(dead_code)] // Used by other test files
pub const TEST_ACCOUNT: &str = "acc-test";

/// Collector URL nothing listens on; telemetry to it fails fast.
#[allow(dead_code)] // Used by other test files
pub const UNREACHABLE_LOG_HOST: &str = "http://127.0.0.1:9/log";

/// In-memory session with an active account and telemetry pointed at `log_host`.
#[allow(dead_code)] // Used by other test files
pub fn session_with_account(log_host: &str) -> MemorySessionStore {
    MemorySessionStore::new(NetworkIdentity::new("session-http-tests/1.0"), "tests")
        .with_var(VAR_ACCOUNT, TEST_ACCOUNT)
        .with_var(VAR_LOG_HOST, log_host)
}

/// Stores `blob` base64-encoded in the test account's identity row.
#[allow(dead_code)] // Used by other test files
pub fn with_persisted_cookies(session: MemorySessionStore, blob: &str) -> MemorySessionStore {
    let key = RowKey {
        column: IDENTITY_KEY_COLUMN,
        value: TEST_ACCOUNT,
    };
    session.with_row(IDENTITY_TABLE, key, COLUMN_COOKIES, &STANDARD.encode(blob))
}

/// Requester over the given session and backends, with a telemetry client that
/// gives up quickly.
pub fn requester_with(session: Arc<dyn SessionStore>, backends: Backends) -> Requester {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(500))
        .build()
        .expect("Failed to build telemetry client");
    Requester::with_telemetry(session, backends, TelemetryLogger::with_client(client))
}

/// Requester over the default reqwest transports.
#[allow(dead_code)] // Used by other test files
pub fn requester(session: Arc<MemorySessionStore>) -> Requester {
    requester_with(session, Backends::with_default_transports())
}

/// Cookie blob JSON for `(domain, name, value)` triples.
#[allow(dead_code)] // Used by other test files
pub fn cookie_blob(cookies: &[(&str, &str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = cookies
        .iter()
        .map(|(domain, name, value)| {
            serde_json::json!({ "domain": domain, "name": name, "value": value })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}
