//! Request orchestration.
//!
//! [`Requester`] composes header normalization, proxy and cookie resolution, backend
//! dispatch, response parsing, status classification and telemetry into the public
//! GET/POST/PUT/DELETE operations.
//!
//! Outcome policy:
//! - 2xx: the body is returned
//! - other statuses: `"{code} {text}: {body preview}"` is returned, or raised as
//!   [`RequestError::Status`] when throw-on-error is set
//! - status-with-body: `"{code}\r\n\r\n{body}"` for every completed call
//! - backend faults (including the deadline): a status 0 message, returned or raised
//!   as [`RequestError::Transport`]; no transaction record is sent

mod options;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::backend::{Backend, BackendKind, Backends};
use crate::config::{DEFAULT_USER_AGENT, VAR_HEADERS, VAR_JSON, VAR_LOG_HOST};
use crate::error_handling::{
    classify, format_error_message, is_success, InitializationError, RequestError,
    RequestStats, StatusClass,
};
use crate::request::{
    mask_proxy_credentials, normalize_headers, resolve_cookies, resolve_proxy, CookieProvenance,
    Method, RequestDescriptor, ResponseShape,
};
use crate::response::ExecutionResult;
use crate::session::SessionStore;
use crate::telemetry::{endpoint_from_log_host, Origin, TelemetryLogger, TransactionLogRecord};

pub use options::RequestOptions;

/// What a call produced, beyond the caller-visible string.
#[derive(Debug)]
pub struct CallReport {
    /// The value `get`/`post`/`put`/`delete` return.
    pub output: String,
    /// Classified status; 0 for transport faults.
    pub status: u16,
    pub backend: BackendKind,
    pub cookie_provenance: CookieProvenance,
    /// Handle of the detached telemetry POST, `None` when the call aborted.
    pub telemetry: Option<JoinHandle<()>>,
    /// Set when throw-on-error turned the outcome into an error.
    pub failure: Option<RequestError>,
}

impl CallReport {
    /// The value the plain operations return: `output`, or `failure` when set.
    pub fn into_result(self) -> Result<String, RequestError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}

/// Issues calls on behalf of one session.
///
/// Cheap to clone; clones share the backends (and the serialized backend's lock),
/// the telemetry client and the statistics.
#[derive(Clone)]
pub struct Requester {
    session: Arc<dyn SessionStore>,
    backends: Backends,
    telemetry: TelemetryLogger,
    stats: Arc<RequestStats>,
}

impl Requester {
    /// Creates a requester with the default telemetry client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the telemetry client cannot
    /// be built.
    pub fn new(
        session: Arc<dyn SessionStore>,
        backends: Backends,
    ) -> Result<Self, InitializationError> {
        Ok(Self::with_telemetry(session, backends, TelemetryLogger::new()?))
    }

    pub fn with_telemetry(
        session: Arc<dyn SessionStore>,
        backends: Backends,
        telemetry: TelemetryLogger,
    ) -> Self {
        let stats = Arc::new(RequestStats::new());
        Self {
            session,
            backends,
            telemetry: telemetry.with_stats(Arc::clone(&stats)),
            stats,
        }
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub async fn get(&self, url: &str, opts: &RequestOptions) -> Result<String, RequestError> {
        self.execute(Method::Get, url, opts).await
    }

    pub async fn post(&self, url: &str, opts: &RequestOptions) -> Result<String, RequestError> {
        self.execute(Method::Post, url, opts).await
    }

    pub async fn put(&self, url: &str, opts: &RequestOptions) -> Result<String, RequestError> {
        self.execute(Method::Put, url, opts).await
    }

    pub async fn delete(&self, url: &str, opts: &RequestOptions) -> Result<String, RequestError> {
        self.execute(Method::Delete, url, opts).await
    }

    /// Runs one call and returns its caller-visible result.
    ///
    /// The telemetry POST keeps running after this returns.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        opts: &RequestOptions,
    ) -> Result<String, RequestError> {
        self.execute_with_report(method, url, opts)
            .await
            .into_result()
    }

    /// Like [`Requester::execute`], also exposing status, provenance and the
    /// telemetry task.
    ///
    /// A raised error is carried in [`CallReport::failure`], so the telemetry handle
    /// stays available on every path.
    pub async fn execute_with_report(
        &self,
        method: Method,
        url: &str,
        opts: &RequestOptions,
    ) -> CallReport {
        let kind = BackendKind::from_alt_flag(opts.use_alt_backend);
        let backend = self.backends.select(kind);
        let request = self.build_descriptor(method, url, opts, backend).await;
        let masked_proxy = mask_proxy_credentials(&request.proxy);

        debug!(
            "{method} {url} via {kind} backend (cookies: {}, proxy: {masked_proxy})",
            request.cookie_provenance
        );

        let started_at = Utc::now();
        let raw = match backend.execute(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                let message = format_error_message(0, &e.to_string());
                warn!("Request failed: {method} {url} [proxy {masked_proxy}]: {e}");
                self.stats.increment_outcome(StatusClass::ConnectionFailed);
                let failure = opts.throw_on_error.then(|| RequestError::Transport {
                    message: message.clone(),
                });
                return CallReport {
                    output: message,
                    status: 0,
                    backend: kind,
                    cookie_provenance: request.cookie_provenance,
                    telemetry: None,
                    failure,
                };
            }
        };

        let parsed = raw.parse();
        let result = ExecutionResult::new(raw.blob, parsed, started_at, Utc::now());
        let status = result.status;
        let class = classify(status);
        self.stats.increment_outcome(class);

        let telemetry = self.send_telemetry(&request, &result, kind);

        if opts.verbose {
            log_verbose(class, status, &result.body);
        }

        let mut failure = None;
        let output = if opts.status_with_body {
            format!("{status}\r\n\r\n{}", result.body)
        } else if is_success(status) {
            debug!("{method} {url} -> {status} in {}ms", result.duration_ms());
            if opts.parse_json {
                self.store_json(&result.body);
            }
            result.body
        } else {
            let message = format_error_message(status, &result.body);
            warn!("HTTP error: {method} {url} [proxy {masked_proxy}]: {message}");
            if opts.throw_on_error {
                failure = Some(RequestError::Status {
                    status,
                    message: message.clone(),
                });
            }
            message
        };

        CallReport {
            output,
            status,
            backend: kind,
            cookie_provenance: request.cookie_provenance,
            telemetry: Some(telemetry),
            failure,
        }
    }

    /// Resolves caller arguments and session state into a descriptor.
    ///
    /// Resolution problems degrade to omitted fields and are counted in the stats.
    pub async fn build_descriptor(
        &self,
        method: Method,
        url: &str,
        opts: &RequestOptions,
        backend: &dyn Backend,
    ) -> RequestDescriptor {
        let session = self.session.as_ref();
        let identity = session.identity();

        let header_lines: Vec<String> = if opts.headers.is_empty() {
            session.non_empty_var(VAR_HEADERS).into_iter().collect()
        } else {
            opts.headers.clone()
        };
        let default_user_agent = if identity.user_agent.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            identity.user_agent.as_str()
        };
        let normalized = normalize_headers(header_lines.as_slice(), default_user_agent);

        let proxy = resolve_proxy(&opts.proxy, session).await;
        if let Some(path) = proxy.degraded {
            self.stats.increment_degraded(path);
        }

        let cookies = resolve_cookies(
            url,
            opts.cookies.as_deref(),
            session,
            backend.supports_cookie_jar(),
        )
        .await;
        if let Some(path) = cookies.degraded {
            self.stats.increment_degraded(path);
        }
        let cookie_jar = (cookies.provenance == CookieProvenance::TransportContainer)
            .then(|| Arc::clone(&identity.cookie_jar));

        RequestDescriptor {
            method,
            url: url.to_string(),
            body: if method.has_body() {
                opts.body.clone()
            } else {
                String::new()
            },
            headers: normalized.headers,
            cookies: cookies.cookies,
            cookie_provenance: cookies.provenance,
            cookie_jar,
            proxy: proxy.url,
            timeout: opts.timeout,
            user_agent: normalized.user_agent,
            content_type: normalized.content_type,
            response_shape: if opts.body_only {
                ResponseShape::BodyOnly
            } else {
                ResponseShape::HeaderAndBody
            },
        }
    }

    fn send_telemetry(
        &self,
        request: &RequestDescriptor,
        result: &ExecutionResult,
        kind: BackendKind,
    ) -> JoinHandle<()> {
        let session = self.session.as_ref();
        let endpoint = endpoint_from_log_host(session.var(VAR_LOG_HOST).as_deref());
        let record = TransactionLogRecord::new(request, result, kind, Origin::from_session(session));
        self.telemetry.log_transaction(endpoint, record)
    }

    fn store_json(&self, body: &str) {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => self.session.set_var(VAR_JSON, &value.to_string()),
            Err(e) => warn!("Response body is not valid JSON: {e}"),
        }
    }
}

fn log_verbose(class: StatusClass, status: u16, body: &str) {
    match class {
        StatusClass::Success => info!("Request successful: {status}"),
        StatusClass::RateLimited => info!("Rate limited: {status}"),
        StatusClass::ClientError => info!("Client error: {status}"),
        StatusClass::ServerError => info!("Server error: {status}"),
        StatusClass::ConnectionFailed | StatusClass::Unknown => info!("Request failed: {status}"),
    }
    info!("Response body: {body}");
}
