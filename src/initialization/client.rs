//! HTTP client initialization.
//!
//! This module provides functions to build the reqwest clients used by the
//! transports and by the telemetry logger.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::TELEMETRY_TIMEOUT;
use crate::error_handling::{BackendError, InitializationError};
use crate::request::RequestDescriptor;

/// Builds the client for one call.
///
/// Proxy and deadline vary per call, so transports build a fresh client for each
/// descriptor. The client carries:
/// - the descriptor's User-Agent and timeout
/// - the canonical proxy URL, when one was resolved
/// - the session cookie jar, when `jar` is given
/// - the given redirect policy
///
/// # Errors
///
/// Returns `BackendError::InvalidProxy` when reqwest rejects the proxy URL, and a
/// transport error when the client itself cannot be built.
pub fn build_transport_client(
    request: &RequestDescriptor,
    redirect: Policy,
    jar: Option<Arc<Jar>>,
) -> Result<reqwest::Client, BackendError> {
    let mut builder = ClientBuilder::new()
        .timeout(request.timeout)
        .user_agent(request.user_agent.clone())
        .redirect(redirect);

    if !request.proxy.is_empty() {
        let proxy = reqwest::Proxy::all(&request.proxy)
            .map_err(|e| BackendError::InvalidProxy(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    if let Some(jar) = jar {
        builder = builder.cookie_provider(jar);
    }

    Ok(builder.build()?)
}

/// Initializes the telemetry client.
///
/// Carries its own short timeout, independent of any request deadline, so a slow
/// collector can never hold a detached task for long.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_telemetry_client() -> Result<reqwest::Client, InitializationError> {
    init_telemetry_client_with(TELEMETRY_TIMEOUT)
}

/// Same as [`init_telemetry_client`] with an explicit timeout.
pub fn init_telemetry_client_with(timeout: Duration) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .redirect(Policy::none())
        .build()?;
    Ok(client)
}
