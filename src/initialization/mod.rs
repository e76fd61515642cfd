//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - the operational logger
//! - per-call transport clients
//! - the telemetry client
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

pub use client::{build_transport_client, init_telemetry_client, init_telemetry_client_with};
pub use logger::init_logger_with;
