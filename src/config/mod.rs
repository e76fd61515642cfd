//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (reserved tokens, session names, timeouts)
//! - HTTP header name constants and denylists
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel};
