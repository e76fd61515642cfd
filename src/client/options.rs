//! Per-call options.

use std::time::Duration;

use crate::config::{Config, DEFAULT_TIMEOUT_SECS};

/// Caller arguments of one call.
///
/// `Default` is a bodyless call through the serialized backend with a 30 second
/// deadline, no proxy, session default headers and resolved cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Sent for POST and PUT only.
    pub body: String,
    /// Proxy token: empty, `+`, `z` or a literal proxy.
    pub proxy: String,
    /// Raw header lines; empty means "use the session's default header block".
    pub headers: Vec<String>,
    /// Cookie override; `-` disables cookies.
    pub cookies: Option<String>,
    pub timeout: Duration,
    pub throw_on_error: bool,
    pub use_alt_backend: bool,
    /// Return `"{code}\r\n\r\n{body}"` whatever the outcome.
    pub status_with_body: bool,
    pub body_only: bool,
    /// Store a successful JSON body in the session's `json` variable.
    pub parse_json: bool,
    pub verbose: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            body: String::new(),
            proxy: String::new(),
            headers: Vec::new(),
            cookies: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            throw_on_error: false,
            use_alt_backend: false,
            status_with_body: false,
            body_only: false,
            parse_json: false,
            verbose: false,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = proxy.into();
        self
    }

    /// Adds one raw header line (may contain several newline-separated lines).
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    pub fn headers<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_seconds(self, seconds: u64) -> Self {
        self.timeout(Duration::from_secs(seconds))
    }

    pub fn throw_on_error(mut self, enabled: bool) -> Self {
        self.throw_on_error = enabled;
        self
    }

    pub fn alt_backend(mut self, enabled: bool) -> Self {
        self.use_alt_backend = enabled;
        self
    }

    pub fn status_with_body(mut self, enabled: bool) -> Self {
        self.status_with_body = enabled;
        self
    }

    pub fn body_only(mut self, enabled: bool) -> Self {
        self.body_only = enabled;
        self
    }

    pub fn parse_json(mut self, enabled: bool) -> Self {
        self.parse_json = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }
}

impl From<&Config> for RequestOptions {
    fn from(config: &Config) -> Self {
        Self {
            body: config.body.clone(),
            proxy: config.proxy.clone(),
            headers: config.headers.clone(),
            cookies: config.cookies.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
            throw_on_error: config.throw_on_error,
            use_alt_backend: config.alt_backend,
            status_with_body: config.status_with_body,
            body_only: config.body_only,
            parse_json: config.parse_json,
            verbose: config.verbose,
        }
    }
}
