//! Configuration constants.
//!
//! This module defines the constants used throughout the request layer: reserved
//! caller tokens, session variable and row names, timeouts and defaults.

use std::time::Duration;

/// Default per-call deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Content type used when the caller's header list does not carry one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Fallback User-Agent when neither the headers nor the session identity provide one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Maximum number of redirect hops Backend A follows.
pub const MAX_REDIRECT_HOPS: usize = 5;

// Telemetry
/// Collector endpoint used when the session has no `logHost` variable.
pub const DEFAULT_TELEMETRY_ENDPOINT: &str = "http://localhost:10993/http-log";
/// Path suffix of the general log collector.
pub const LOG_PATH_SUFFIX: &str = "/log";
/// Path suffix of the HTTP transaction collector.
pub const TELEMETRY_PATH_SUFFIX: &str = "/http-log";
/// Telemetry POST timeout, independent of the request deadline.
pub const TELEMETRY_TIMEOUT: Duration = Duration::from_secs(2);
/// Timestamp layout of transaction records.
pub const TELEMETRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// Reserved caller tokens
/// Proxy token: use the session proxy, falling back to the identity's persisted proxy.
pub const PROXY_TOKEN_DEFAULT: &str = "+";
/// Proxy token: use the persisted shared proxy.
pub const PROXY_TOKEN_SHARED: &str = "z";
/// Cookie override that disables cookies for the call.
pub const COOKIES_DISABLED: &str = "-";

// Session variables
/// Active account; an empty value means the session has no identity.
pub const VAR_ACCOUNT: &str = "acc0";
/// Cached cookie blob (JSON array).
pub const VAR_COOKIES: &str = "cookies";
/// Session proxy used by the default proxy token.
pub const VAR_PROXY: &str = "proxy";
/// Default header block, newline separated.
pub const VAR_HEADERS: &str = "headers";
/// General log collector URL.
pub const VAR_LOG_HOST: &str = "logHost";
/// Session identifier reported in telemetry.
pub const VAR_SESSION_ID: &str = "varSessionId";
/// Port reported in telemetry.
pub const VAR_PORT: &str = "port";
/// Process id reported in telemetry.
pub const VAR_PID: &str = "pid";
/// Target of the `parse_json` option.
pub const VAR_JSON: &str = "json";

// Persisted identity rows
/// Table holding one row per identity.
pub const IDENTITY_TABLE: &str = "_instance";
/// Key column of the identity table.
pub const IDENTITY_KEY_COLUMN: &str = "id";
/// Base64-encoded cookie blob column.
pub const COLUMN_COOKIES: &str = "cookies";
/// Per-identity proxy column.
pub const COLUMN_PROXY: &str = "proxy";
/// Shared proxy column.
pub const COLUMN_SHARED_PROXY: &str = "z_proxy";

/// Characters of the response body kept in error messages.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 100;

/// Default SQLite session store path for the CLI.
pub const DB_PATH: &str = "./session_store.db";
