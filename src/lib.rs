//! session_http library: session-aware outbound HTTP requests
//!
//! Issues GET/POST/PUT/DELETE calls on behalf of a session profile. Each call
//! resolves its cookies, proxy and identity headers from layered session state,
//! runs through one of two interchangeable backends, is reduced to a
//! `(status, body)` pair and is reported to a telemetry collector without delaying
//! the caller.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use session_http::{
//!     Backends, MemorySessionStore, NetworkIdentity, RequestOptions, Requester,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MemorySessionStore::new(NetworkIdentity::new("MyAgent/1.0"), "crawler")
//!     .with_var("acc0", "account-1");
//! let requester = Requester::new(Arc::new(session), Backends::with_default_transports())?;
//!
//! let body = requester
//!     .get("https://api.example.com/x", &RequestOptions::new().proxy("+"))
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime: backends and telemetry spawn and await
//! tokio tasks.

pub mod backend;
pub mod client;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod request;
pub mod response;
pub mod session;
pub mod telemetry;

// Re-export public API
pub use backend::{Backend, BackendKind, Backends, ConcurrentBackend, SerializedBackend, Transport};
pub use client::{CallReport, RequestOptions, Requester};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{BackendError, RequestError, RequestStats, StoreError};
pub use request::{CookieProvenance, Method, RequestDescriptor};
pub use session::{MemorySessionStore, NetworkIdentity, SessionStore, SqliteSessionStore};
