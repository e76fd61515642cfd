//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DB_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::request::Method;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for issuing a single session-bound request.
///
/// # Examples
///
/// ```bash
/// # Plain GET through the serialized backend
/// session_http get https://api.example.com/x --account acc-1
///
/// # POST with headers through the concurrent backend, session proxy
/// session_http post https://api.example.com/x --body '{"a":1}' \
///     -H 'Accept: application/json' --proxy + --alt-backend
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "session_http",
    about = "Issues one HTTP request on behalf of a stored session profile."
)]
pub struct Config {
    /// HTTP method
    #[arg(value_enum)]
    pub method: Method,

    /// Target URL
    pub url: String,

    /// Request body (ignored for GET and DELETE)
    #[arg(long, default_value = "")]
    pub body: String,

    /// Proxy token: empty, `+` (session proxy), `z` (shared proxy) or a literal proxy
    #[arg(long, default_value = "")]
    pub proxy: String,

    /// Header line `Key: Value`, repeatable
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Cookie override; `-` disables cookies for this call
    #[arg(long)]
    pub cookies: Option<String>,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Fail with a non-zero exit code on HTTP error statuses
    #[arg(long)]
    pub throw_on_error: bool,

    /// Dispatch through the concurrent backend instead of the serialized one
    #[arg(long)]
    pub alt_backend: bool,

    /// Print `"{status}\r\n\r\n{body}"` regardless of outcome
    #[arg(long)]
    pub status_with_body: bool,

    /// Ask the serialized backend for the body only
    #[arg(long)]
    pub body_only: bool,

    /// Parse a successful body as JSON into the session `json` variable
    #[arg(long)]
    pub parse_json: bool,

    /// Log status and response body at info level
    #[arg(long)]
    pub verbose: bool,

    /// SQLite session store path
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Active account (identity row key); no account means no cookies
    #[arg(long)]
    pub account: Option<String>,

    /// Session identifier reported in telemetry
    #[arg(long)]
    pub session_id: Option<String>,

    /// Project name reported in telemetry
    #[arg(long, default_value = "session_http")]
    pub project: String,

    /// Identity User-Agent used when the headers do not carry one
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// General log collector URL; transaction records go to its `/http-log` sibling
    #[arg(long)]
    pub log_host: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::parse_from(["session_http", "get", "https://example.com/"]);
        assert_eq!(config.method, Method::Get);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert!(config.headers.is_empty());
        assert!(config.cookies.is_none());
        assert!(!config.throw_on_error);
        assert!(!config.alt_backend);
        assert_eq!(config.db_path, PathBuf::from(DB_PATH));
    }

    #[test]
    fn test_config_repeated_headers() {
        let config = Config::parse_from([
            "session_http",
            "post",
            "https://example.com/",
            "--body",
            "{}",
            "-H",
            "Accept: */*",
            "--header",
            "X-Trace: 1",
            "--proxy",
            "+",
            "--alt-backend",
        ]);
        assert_eq!(config.method, Method::Post);
        assert_eq!(config.headers, vec!["Accept: */*", "X-Trace: 1"]);
        assert_eq!(config.proxy, "+");
        assert!(config.alt_backend);
    }
}
