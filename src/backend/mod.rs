//! Backend execution strategies.
//!
//! A backend takes a fully built [`RequestDescriptor`] and returns the raw output of
//! its transport. Two strategies exist:
//! - [`SerializedBackend`]: one in-flight call per process, pseudo-HTTP document output
//! - [`ConcurrentBackend`]: unrestricted, sentinel-delimited output
//!
//! Strategies own the deadline and the lock; [`Transport`] implementations only move
//! bytes. Tests swap the transport to observe scheduling without a network.

mod concurrent;
mod document;
mod plain;
mod serialized;

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderName, HeaderValue};
use strum_macros::Display;

use crate::error_handling::BackendError;
use crate::request::RequestDescriptor;
use crate::response::{parse_raw, ParsedResponse};

pub use concurrent::ConcurrentBackend;
pub use document::DocumentTransport;
pub use plain::{fold_cookie_header, PlainTransport};
pub use serialized::SerializedBackend;

/// Which strategy executes a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BackendKind {
    /// Backend A.
    #[strum(to_string = "serialized")]
    Serialized,
    /// Backend B.
    #[strum(to_string = "concurrent")]
    Concurrent,
}

impl BackendKind {
    /// Resolves the caller's "use alternative backend" flag.
    pub fn from_alt_flag(use_alt: bool) -> Self {
        if use_alt {
            BackendKind::Concurrent
        } else {
            BackendKind::Serialized
        }
    }
}

/// Raw backend output tagged with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub kind: BackendKind,
    pub blob: String,
}

impl RawResponse {
    /// Parses the blob with the parser matching its backend.
    pub fn parse(&self) -> ParsedResponse {
        parse_raw(self.kind, &self.blob)
    }
}

/// Moves one request over the wire and returns the transport's raw text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<String, BackendError>;

    /// Whether the transport can attach a session-bound cookie jar.
    fn supports_cookie_jar(&self) -> bool {
        false
    }
}

/// One execution strategy.
#[async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn supports_cookie_jar(&self) -> bool;

    /// Executes the call within `request.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Timeout` when the deadline elapses and the transport's
    /// error on a hard transport fault.
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, BackendError>;
}

/// Serialized backend over the reqwest transport, shared by every
/// [`Backends::with_default_transports`] value in the process.
static DEFAULT_SERIALIZED: LazyLock<Arc<SerializedBackend>> =
    LazyLock::new(|| Arc::new(SerializedBackend::new(Arc::new(DocumentTransport))));

/// The pair of strategies a requester dispatches to.
///
/// Clones share the serialized backend's lock. Every value built with
/// [`Backends::with_default_transports`] uses the same process-wide serialized
/// backend; [`Backends::new`] gives the supplied backend its own lock.
#[derive(Clone)]
pub struct Backends {
    serialized: Arc<SerializedBackend>,
    concurrent: Arc<ConcurrentBackend>,
}

impl Backends {
    pub fn new(serialized: SerializedBackend, concurrent: ConcurrentBackend) -> Self {
        Self {
            serialized: Arc::new(serialized),
            concurrent: Arc::new(concurrent),
        }
    }

    /// Both strategies driven by their reqwest transports.
    pub fn with_default_transports() -> Self {
        Self {
            serialized: Arc::clone(&DEFAULT_SERIALIZED),
            concurrent: Arc::new(ConcurrentBackend::new(Arc::new(PlainTransport))),
        }
    }

    pub fn select(&self, kind: BackendKind) -> &dyn Backend {
        match kind {
            BackendKind::Serialized => self.serialized.as_ref(),
            BackendKind::Concurrent => self.concurrent.as_ref(),
        }
    }
}

impl Default for Backends {
    fn default() -> Self {
        Self::with_default_transports()
    }
}

/// Applies header lines to a request builder, skipping names or values reqwest
/// would reject.
pub(crate) fn apply_headers<'a>(
    mut builder: reqwest::RequestBuilder,
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => builder = builder.header(name, value),
            _ => debug!("Skipping invalid header line: {name}: {value}"),
        }
    }
    builder
}
