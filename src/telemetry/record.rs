//! Transaction log record.

use serde::Serialize;

use crate::backend::BackendKind;
use crate::config::{
    TELEMETRY_TIMESTAMP_FORMAT, VAR_ACCOUNT, VAR_PID, VAR_PORT, VAR_SESSION_ID,
};
use crate::request::{mask_proxy_credentials, CookieProvenance, RequestDescriptor};
use crate::response::ExecutionResult;
use crate::session::SessionStore;

/// Request half of a record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSection {
    pub headers: Vec<String>,
    pub cookies: Option<String>,
    pub cookies_source: CookieProvenance,
    pub body: String,
    /// Masked: credentials never leave the process.
    pub proxy: String,
}

/// Response half of a record.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSection {
    pub body: String,
}

/// Who sent the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub machine: String,
    pub project: String,
    pub account: String,
    pub session: String,
    pub port: String,
    pub pid: String,
}

impl Origin {
    /// Reads the origin fields from session state; missing values are empty.
    pub fn from_session(session: &dyn SessionStore) -> Self {
        let var = |name: &str| session.var(name).unwrap_or_default();
        Self {
            machine: machine_name(),
            project: session.project_name(),
            account: var(VAR_ACCOUNT),
            session: var(VAR_SESSION_ID),
            port: var(VAR_PORT),
            pid: var(VAR_PID),
        }
    }
}

/// One completed call, as POSTed to the collector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLogRecord {
    pub timestamp: String,
    pub method: String,
    pub url: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub backend: String,
    pub request: RequestSection,
    pub response: ResponseSection,
    #[serde(flatten)]
    pub origin: Origin,
}

impl TransactionLogRecord {
    pub fn new(
        request: &RequestDescriptor,
        result: &ExecutionResult,
        backend: BackendKind,
        origin: Origin,
    ) -> Self {
        Self {
            timestamp: result
                .started_at
                .format(TELEMETRY_TIMESTAMP_FORMAT)
                .to_string(),
            method: request.method.to_string(),
            url: request.url.clone(),
            status_code: result.status,
            duration_ms: result.duration_ms(),
            backend: backend.to_string(),
            request: RequestSection {
                headers: request.headers.to_lines(),
                cookies: request.cookies.clone(),
                cookies_source: request.cookie_provenance,
                body: request.body.clone(),
                proxy: mask_proxy_credentials(&request.proxy),
            },
            response: ResponseSection {
                body: result.body.clone(),
            },
            origin,
        }
    }
}

/// Host name from the environment, `unknown` when unset.
pub fn machine_name() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}
