//! Error type definitions.
//!
//! This module defines the error enums used throughout the request layer and the
//! categories used by outcome statistics.

use std::time::Duration;

use log::SetLoggerError;
use strum_macros::{Display, EnumIter as EnumIterMacro};
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// Error opening the session store.
    #[error("Session store initialization error: {0}")]
    StoreError(#[from] StoreError),
}

/// Error types for session row store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Table or column name that is not a plain identifier.
    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),
}

/// Category of a transport-level failure reported by reqwest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TransportErrorKind {
    #[strum(to_string = "request builder error")]
    Builder,
    #[strum(to_string = "redirect error")]
    Redirect,
    #[strum(to_string = "timeout")]
    Timeout,
    #[strum(to_string = "connect error")]
    Connect,
    #[strum(to_string = "request error")]
    Request,
    #[strum(to_string = "body error")]
    Body,
    #[strum(to_string = "decode error")]
    Decode,
    #[strum(to_string = "transport error")]
    Other,
}

/// Hard failure of a backend execution: the call aborted before a response existed.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The per-call deadline elapsed during the network phase.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport failed before producing a response.
    #[error("{kind}: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The resolved proxy URL was rejected by the transport.
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),
}

/// Caller-visible failure, only produced when throw-on-error is requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The call completed with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The transport failed; classified as status 0.
    #[error("{message}")]
    Transport { message: String },
}

impl RequestError {
    /// Classified status code of the failure (0 for transport faults).
    pub fn status(&self) -> u16 {
        match self {
            RequestError::Status { status, .. } => *status,
            RequestError::Transport { .. } => 0,
        }
    }
}

/// Resolution steps that degrade to "field omitted" instead of failing the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Display)]
pub enum DegradedPath {
    #[strum(to_string = "proxy parse")]
    ProxyParse,
    #[strum(to_string = "cookie decode")]
    CookieDecode,
    #[strum(to_string = "cookie blob parse")]
    CookieBlobParse,
    #[strum(to_string = "invalid cookie header")]
    InvalidCookieHeader,
    #[strum(to_string = "row lookup")]
    RowLookup,
    #[strum(to_string = "telemetry delivery")]
    TelemetryDelivery,
}
