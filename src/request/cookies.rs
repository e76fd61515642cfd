//! Cookie resolution.
//!
//! Resolves the cookie header of a call by walking the layers in order, first hit
//! wins:
//! 1. disabled (`-` override) or no active identity: no cookies
//! 2. explicit caller override, used verbatim
//! 3. cookie blob cached in the session variable, then the identity's persisted
//!    base64 blob (decoded and written back to the variable)
//! 4. the backend's session-bound cookie jar
//!
//! A blob is a JSON array of `{domain, name, value}` objects; only cookies whose
//! domain matches the request host are sent. Every failure degrades to "no cookie
//! header" and never fails the call.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use serde_json::Value;

use super::descriptor::CookieProvenance;
use super::proxy::identity_row_value;
use crate::config::{COLUMN_COOKIES, COOKIES_DISABLED, VAR_ACCOUNT, VAR_COOKIES};
use crate::error_handling::DegradedPath;
use crate::session::SessionStore;

/// Outcome of cookie resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieResolution {
    /// `name=value; name=value;` or `None`.
    pub cookies: Option<String>,
    pub provenance: CookieProvenance,
    /// Set when a layer failed and was skipped.
    pub degraded: Option<DegradedPath>,
}

impl CookieResolution {
    fn without_cookies(provenance: CookieProvenance) -> Self {
        Self {
            cookies: None,
            provenance,
            degraded: None,
        }
    }
}

/// Session-side layers that can supply a cookie blob, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlobSource {
    SessionCache,
    PersistedStore,
}

const BLOB_CHAIN: [BlobSource; 2] = [BlobSource::SessionCache, BlobSource::PersistedStore];

enum BlobLookup {
    Found(String),
    Missing,
    Degraded(DegradedPath),
}

impl BlobSource {
    fn provenance(self) -> CookieProvenance {
        match self {
            BlobSource::SessionCache => CookieProvenance::CachedVariable,
            BlobSource::PersistedStore => CookieProvenance::PersistedStore,
        }
    }

    async fn lookup(self, session: &dyn SessionStore) -> BlobLookup {
        match self {
            BlobSource::SessionCache => match session.non_empty_var(VAR_COOKIES) {
                Some(blob) => BlobLookup::Found(blob),
                None => BlobLookup::Missing,
            },
            BlobSource::PersistedStore => {
                let encoded = match identity_row_value(session, COLUMN_COOKIES).await {
                    Ok(Some(encoded)) => encoded,
                    Ok(None) => return BlobLookup::Missing,
                    Err(path) => return BlobLookup::Degraded(path),
                };
                match decode_cookie_blob(&encoded) {
                    Some(blob) if !blob.is_empty() => {
                        session.set_var(VAR_COOKIES, &blob);
                        BlobLookup::Found(blob)
                    }
                    Some(_) => BlobLookup::Missing,
                    None => BlobLookup::Degraded(DegradedPath::CookieDecode),
                }
            }
        }
    }
}

fn decode_cookie_blob(encoded: &str) -> Option<String> {
    let bytes = match STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Persisted cookie blob is not valid base64: {e}");
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(blob) => Some(blob),
        Err(e) => {
            warn!("Persisted cookie blob is not valid UTF-8: {e}");
            None
        }
    }
}

/// Whether a cookie domain applies to a request host.
///
/// A leading `.` matches the bare domain and any subdomain of it; otherwise the
/// host must equal the domain. Comparison ignores ASCII case.
pub fn domain_matches(host: &str, cookie_domain: &str) -> bool {
    if host.is_empty() || cookie_domain.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    let cookie_domain = cookie_domain.to_ascii_lowercase();

    match cookie_domain.strip_prefix('.') {
        Some(bare) if !bare.is_empty() => {
            host == bare
                || host
                    .strip_suffix(bare)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        Some(_) => false,
        None => host == cookie_domain,
    }
}

fn json_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Builds the cookie header for `host` from a JSON cookie blob.
///
/// Returns `Ok(None)` when no cookie matches and an error when the blob is not a
/// JSON array.
pub fn cookie_header_for_host(host: &str, blob: &str) -> Result<Option<String>, serde_json::Error> {
    let cookies: Vec<Value> = serde_json::from_str(blob)?;

    let pairs: Vec<String> = cookies
        .iter()
        .filter(|cookie| domain_matches(host, &json_text(cookie.get("domain"))))
        .filter_map(|cookie| {
            let name = json_text(cookie.get("name"));
            if name.is_empty() {
                return None;
            }
            Some(format!("{}={}", name, json_text(cookie.get("value"))))
        })
        .collect();

    if pairs.is_empty() {
        Ok(None)
    } else {
        Ok(Some(format!("{};", pairs.join("; "))))
    }
}

fn is_valid_header_value(value: &str) -> bool {
    reqwest::header::HeaderValue::from_str(value).is_ok()
}

fn request_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Resolves the cookies of one call.
///
/// `jar_supported` tells whether the chosen backend can fall back to the session
/// cookie jar; without it the last layer yields no cookies at all.
pub async fn resolve_cookies(
    url: &str,
    cookie_override: Option<&str>,
    session: &dyn SessionStore,
    jar_supported: bool,
) -> CookieResolution {
    if cookie_override == Some(COOKIES_DISABLED) || session.non_empty_var(VAR_ACCOUNT).is_none() {
        return CookieResolution::without_cookies(CookieProvenance::None);
    }

    let fallback = if jar_supported {
        CookieProvenance::TransportContainer
    } else {
        CookieProvenance::None
    };

    if let Some(explicit) = cookie_override.filter(|c| !c.is_empty()) {
        if !is_valid_header_value(explicit) {
            warn!("Cookie override is not a valid header value, sending without it");
            return CookieResolution {
                cookies: None,
                provenance: fallback,
                degraded: Some(DegradedPath::InvalidCookieHeader),
            };
        }
        return CookieResolution {
            cookies: Some(explicit.to_string()),
            provenance: CookieProvenance::ExplicitOverride,
            degraded: None,
        };
    }

    let mut degraded = None;
    let mut found = None;
    for source in BLOB_CHAIN {
        match source.lookup(session).await {
            BlobLookup::Found(blob) => {
                found = Some((blob, source.provenance()));
                break;
            }
            BlobLookup::Missing => {}
            BlobLookup::Degraded(path) => degraded = Some(path),
        }
    }

    let Some((blob, provenance)) = found else {
        return CookieResolution {
            cookies: None,
            provenance: fallback,
            degraded,
        };
    };

    let Some(host) = request_host(url) else {
        debug!("No host in {url}, skipping session cookies");
        return CookieResolution {
            cookies: None,
            provenance: fallback,
            degraded,
        };
    };

    match cookie_header_for_host(&host, &blob) {
        Ok(Some(cookies)) if !is_valid_header_value(&cookies) => {
            warn!("Stored cookies for {host} are not a valid header value, sending without them");
            CookieResolution {
                cookies: None,
                provenance: fallback,
                degraded: Some(DegradedPath::InvalidCookieHeader),
            }
        }
        Ok(Some(cookies)) => CookieResolution {
            cookies: Some(cookies),
            provenance,
            degraded,
        },
        Ok(None) => {
            debug!("No stored cookies match {host}");
            CookieResolution {
                cookies: None,
                provenance: fallback,
                degraded,
            }
        }
        Err(e) => {
            warn!("Cookie blob is not a JSON array, sending without it: {e}");
            CookieResolution {
                cookies: None,
                provenance: fallback,
                degraded: Some(DegradedPath::CookieBlobParse),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IDENTITY_KEY_COLUMN, IDENTITY_TABLE};
    use crate::session::{MemorySessionStore, RowKey};

    const BLOB: &str = r#"[
        {"domain": ".example.com", "name": "sid", "value": "abc"},
        {"domain": "api.example.com", "name": "api", "value": "1"},
        {"domain": "other.org", "name": "x", "value": "y"}
    ]"#;

    fn account_key() -> RowKey<'static> {
        RowKey {
            column: IDENTITY_KEY_COLUMN,
            value: "acc-1",
        }
    }

    fn session_with_account() -> MemorySessionStore {
        MemorySessionStore::default().with_var(VAR_ACCOUNT, "acc-1")
    }

    #[test]
    fn test_dot_domain_matching() {
        assert!(domain_matches("example.com", ".example.com"));
        assert!(domain_matches("api.example.com", ".example.com"));
        assert!(domain_matches("a.b.example.com", ".example.com"));
        assert!(!domain_matches("notexample.com", ".example.com"));
        assert!(!domain_matches("example.org", ".example.com"));
    }

    #[test]
    fn test_exact_domain_matching() {
        assert!(domain_matches("api.example.com", "api.example.com"));
        assert!(domain_matches("API.Example.com", "api.example.com"));
        assert!(!domain_matches("www.api.example.com", "api.example.com"));
        assert!(!domain_matches("example.com", "api.example.com"));
        assert!(!domain_matches("example.com", ""));
        assert!(!domain_matches("example.com", "."));
    }

    #[test]
    fn test_cookie_header_for_host() {
        assert_eq!(
            cookie_header_for_host("api.example.com", BLOB).unwrap(),
            Some("sid=abc; api=1;".to_string())
        );
        assert_eq!(
            cookie_header_for_host("example.com", BLOB).unwrap(),
            Some("sid=abc;".to_string())
        );
        assert_eq!(cookie_header_for_host("nowhere.net", BLOB).unwrap(), None);
    }

    #[test]
    fn test_cookie_header_skips_nameless_and_stringifies_values() {
        let blob = r#"[
            {"domain": "h.io", "value": "orphan"},
            {"domain": "h.io", "name": "n", "value": 42},
            {"domain": "h.io", "name": "empty"}
        ]"#;
        assert_eq!(
            cookie_header_for_host("h.io", blob).unwrap(),
            Some("n=42; empty=;".to_string())
        );
    }

    #[test]
    fn test_cookie_header_rejects_non_array() {
        assert!(cookie_header_for_host("h.io", "{not json").is_err());
        assert!(cookie_header_for_host("h.io", r#"{"a":1}"#).is_err());
    }

    #[tokio::test]
    async fn test_disabled_override() {
        let session = session_with_account().with_var(VAR_COOKIES, BLOB);
        let res = resolve_cookies("https://api.example.com/", Some("-"), &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::None);
    }

    #[tokio::test]
    async fn test_no_identity_means_no_cookies() {
        let session = MemorySessionStore::default().with_var(VAR_COOKIES, BLOB);
        let res = resolve_cookies("https://api.example.com/", Some("a=b"), &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::None);
    }

    #[tokio::test]
    async fn test_explicit_override_verbatim() {
        let session = session_with_account().with_var(VAR_COOKIES, BLOB);
        let res = resolve_cookies("https://api.example.com/", Some("k=v"), &session, true).await;
        assert_eq!(res.cookies.as_deref(), Some("k=v"));
        assert_eq!(res.provenance, CookieProvenance::ExplicitOverride);
    }

    #[tokio::test]
    async fn test_cached_variable() {
        let session = session_with_account().with_var(VAR_COOKIES, BLOB);
        let res = resolve_cookies("https://api.example.com/", None, &session, true).await;
        assert_eq!(res.cookies.as_deref(), Some("sid=abc; api=1;"));
        assert_eq!(res.provenance, CookieProvenance::CachedVariable);
    }

    #[tokio::test]
    async fn test_persisted_store_then_cached() {
        let encoded = STANDARD.encode(BLOB);
        let session = session_with_account().with_row(
            IDENTITY_TABLE,
            account_key(),
            COLUMN_COOKIES,
            &encoded,
        );

        let first = resolve_cookies("https://example.com/", Some(""), &session, true).await;
        assert_eq!(first.cookies.as_deref(), Some("sid=abc;"));
        assert_eq!(first.provenance, CookieProvenance::PersistedStore);
        assert_eq!(session.var(VAR_COOKIES).as_deref(), Some(BLOB));

        let second = resolve_cookies("https://example.com/", None, &session, true).await;
        assert_eq!(second.cookies.as_deref(), Some("sid=abc;"));
        assert_eq!(second.provenance, CookieProvenance::CachedVariable);
    }

    #[tokio::test]
    async fn test_nothing_available_uses_container() {
        let session = session_with_account();
        let res = resolve_cookies("https://api.example.com/x", None, &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::TransportContainer);

        let res = resolve_cookies("https://api.example.com/x", None, &session, false).await;
        assert_eq!(res.provenance, CookieProvenance::None);
    }

    #[tokio::test]
    async fn test_no_matching_cookie_uses_container() {
        let session = session_with_account().with_var(VAR_COOKIES, BLOB);
        let res = resolve_cookies("https://nowhere.net/", None, &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::TransportContainer);
        assert_eq!(res.degraded, None);
    }

    #[tokio::test]
    async fn test_override_with_line_break_degrades() {
        let session = session_with_account();
        let res = resolve_cookies(
            "https://example.com/",
            Some("a=b\r\nX-Injected: 1"),
            &session,
            true,
        )
        .await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::TransportContainer);
        assert_eq!(res.degraded, Some(DegradedPath::InvalidCookieHeader));
    }

    #[tokio::test]
    async fn test_stored_cookie_with_line_break_degrades() {
        let blob = r#"[{"domain":".example.com","name":"sid","value":"a\nb"}]"#;
        let session = session_with_account().with_var(VAR_COOKIES, blob);
        let res = resolve_cookies("https://example.com/", None, &session, false).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::None);
        assert_eq!(res.degraded, Some(DegradedPath::InvalidCookieHeader));
    }

    #[tokio::test]
    async fn test_unparsable_blob_degrades() {
        let session = session_with_account().with_var(VAR_COOKIES, "not json");
        let res = resolve_cookies("https://example.com/", None, &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.degraded, Some(DegradedPath::CookieBlobParse));
    }

    #[tokio::test]
    async fn test_undecodable_persisted_blob_degrades() {
        let session = session_with_account().with_row(
            IDENTITY_TABLE,
            account_key(),
            COLUMN_COOKIES,
            "%%% not base64 %%%",
        );
        let res = resolve_cookies("https://example.com/", None, &session, true).await;
        assert_eq!(res.cookies, None);
        assert_eq!(res.provenance, CookieProvenance::TransportContainer);
        assert_eq!(res.degraded, Some(DegradedPath::CookieDecode));
        assert_eq!(session.var(VAR_COOKIES), None);
    }
}
