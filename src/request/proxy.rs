//! Proxy token resolution.
//!
//! A caller passes a proxy *token*: empty (no proxy), a reserved alias resolved
//! through session state, or a literal `[scheme://][user:pass@]host:port`. Every
//! token is reduced to the canonical `http://[user:pass@]host:port` form, or to
//! the empty string when nothing usable is found.

use log::{debug, warn};
use thiserror::Error;

use crate::config::{
    COLUMN_PROXY, COLUMN_SHARED_PROXY, IDENTITY_KEY_COLUMN, IDENTITY_TABLE, PROXY_TOKEN_DEFAULT,
    PROXY_TOKEN_SHARED, VAR_ACCOUNT, VAR_PROXY,
};
use crate::error_handling::DegradedPath;
use crate::session::{RowKey, SessionStore};

/// Why a literal proxy could not be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProxyParseError {
    #[error("credentials must be user:pass")]
    MissingPassword,
    #[error("missing host after '@'")]
    MissingHost,
    #[error("not a usable proxy URL: {0}")]
    InvalidUrl(String),
}

/// Parses a literal proxy into its canonical URL.
///
/// A leading `xxx://` is stripped. With credentials the first `@` separates them
/// from the host, and anything after a second `@` is dropped, so the result holds
/// exactly one `@`. The canonical form must parse as a URL with a host.
pub fn parse_proxy(raw: &str) -> Result<String, ProxyParseError> {
    let stripped = match raw.split_once("//") {
        Some((_, rest)) => rest,
        None => raw,
    };

    let canonical = if stripped.contains('@') {
        let mut parts = stripped.split('@');
        let credentials = parts.next().unwrap_or_default();
        let host = parts.next().unwrap_or_default();
        if host.is_empty() {
            return Err(ProxyParseError::MissingHost);
        }
        let (user, pass) = credentials
            .split_once(':')
            .ok_or(ProxyParseError::MissingPassword)?;
        format!("http://{user}:{pass}@{host}")
    } else {
        format!("http://{stripped}")
    };

    match url::Url::parse(&canonical) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(canonical),
        Ok(_) | Err(url::ParseError::EmptyHost) => Err(ProxyParseError::MissingHost),
        Err(e) => Err(ProxyParseError::InvalidUrl(e.to_string())),
    }
}

/// Masks proxy credentials for logs.
///
/// `http://u:p@host:port` becomes `***:***@host:port`; proxies without
/// credentials pass through unchanged.
pub fn mask_proxy_credentials(proxy: &str) -> String {
    let mut parts = proxy.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(host), None) => format!("***:***@{host}"),
        _ => proxy.to_string(),
    }
}

/// Looks up a non-empty identity row value.
///
/// Store failures are logged and reported as [`DegradedPath::RowLookup`]; callers
/// treat them like a missing value.
pub(crate) async fn identity_row_value(
    session: &dyn SessionStore,
    column: &str,
) -> Result<Option<String>, DegradedPath> {
    let account = session.non_empty_var(VAR_ACCOUNT).unwrap_or_default();
    let key = RowKey {
        column: IDENTITY_KEY_COLUMN,
        value: &account,
    };
    match session.row_value(column, IDENTITY_TABLE, key).await {
        Ok(value) => Ok(value.filter(|v| !v.is_empty())),
        Err(e) => {
            warn!("Identity row lookup failed for column {column}: {e}");
            Err(DegradedPath::RowLookup)
        }
    }
}

/// Expands the reserved aliases; literal tokens pass through.
async fn expand_token(
    token: &str,
    session: &dyn SessionStore,
) -> Result<Option<String>, DegradedPath> {
    match token {
        PROXY_TOKEN_DEFAULT => match session.non_empty_var(VAR_PROXY) {
            Some(proxy) => Ok(Some(proxy)),
            None => identity_row_value(session, COLUMN_PROXY).await,
        },
        PROXY_TOKEN_SHARED => identity_row_value(session, COLUMN_SHARED_PROXY).await,
        literal => Ok(Some(literal.to_string())),
    }
}

/// Result of proxy resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProxy {
    /// Canonical proxy URL or empty.
    pub url: String,
    /// Set when a step failed and the call goes out without a proxy.
    pub degraded: Option<DegradedPath>,
}

impl ResolvedProxy {
    fn direct(degraded: Option<DegradedPath>) -> Self {
        Self {
            url: String::new(),
            degraded,
        }
    }
}

/// Resolves a proxy token to its canonical URL.
pub async fn resolve_proxy(token: &str, session: &dyn SessionStore) -> ResolvedProxy {
    if token.is_empty() {
        return ResolvedProxy::direct(None);
    }

    let raw = match expand_token(token, session).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("Proxy token {token:?} resolved to nothing, sending without proxy");
            return ResolvedProxy::direct(None);
        }
        Err(path) => return ResolvedProxy::direct(Some(path)),
    };

    match parse_proxy(&raw) {
        Ok(url) => ResolvedProxy {
            url,
            degraded: None,
        },
        Err(e) => {
            warn!(
                "Proxy parsing error: [{e}] [{}]",
                mask_proxy_credentials(&raw)
            );
            ResolvedProxy::direct(Some(DegradedPath::ProxyParse))
        }
    }
}
