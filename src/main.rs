//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `session_http` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Session store setup and output printing
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use session_http::config::{VAR_ACCOUNT, VAR_LOG_HOST, VAR_SESSION_ID};
use session_http::initialization::init_logger_with;
use session_http::{
    Backends, Config, NetworkIdentity, RequestOptions, Requester, SessionStore,
    SqliteSessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let store = SqliteSessionStore::open(
        &config.db_path,
        NetworkIdentity::new(config.user_agent.clone()),
        config.project.clone(),
    )
    .await
    .with_context(|| format!("Failed to open session store {}", config.db_path.display()))?;

    let bindings = [
        (VAR_ACCOUNT, &config.account),
        (VAR_SESSION_ID, &config.session_id),
        (VAR_LOG_HOST, &config.log_host),
    ];
    for (name, value) in bindings {
        if let Some(value) = value {
            store.set_var(name, value);
        }
    }

    let requester = Requester::new(Arc::new(store), Backends::with_default_transports())
        .context("Failed to initialize requester")?;
    let opts = RequestOptions::from(&config);

    let report = requester
        .execute_with_report(config.method, &config.url, &opts)
        .await;
    requester.stats().log_summary();

    // The process is about to exit; let the record reach the collector first.
    if let Some(telemetry) = report.telemetry {
        if let Err(e) = telemetry.await {
            debug!("Telemetry task failed: {e}");
        }
    }

    match report.failure {
        None => {
            println!("{}", report.output);
            Ok(())
        }
        Some(e) => {
            eprintln!("session_http error: {e}");
            process::exit(1);
        }
    }
}
