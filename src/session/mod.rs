//! Session and identity store.
//!
//! The request layer reads cookies, proxies, default headers and identity fields
//! from a store it does not own. [`SessionStore`] is that seam:
//! - named string variables scoped to the calling session
//! - single values from a persisted row store (column + table + key filter)
//! - the session's current network identity (User-Agent, cookie jar)
//!
//! Two implementations ship with the crate: [`MemorySessionStore`] for embedding
//! and tests, and [`SqliteSessionStore`] backed by an `sqlx` SQLite pool.

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;

use crate::error_handling::StoreError;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

/// Key filter selecting one row of a persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowKey<'a> {
    /// Key column name
    pub column: &'a str,
    /// Key value
    pub value: &'a str,
}

/// Active network identity of a session.
///
/// The cookie jar is owned by the session and handed to the transport when a call
/// relies on transport-container cookies.
#[derive(Debug, Clone)]
pub struct NetworkIdentity {
    pub user_agent: String,
    pub cookie_jar: Arc<Jar>,
}

impl NetworkIdentity {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            cookie_jar: Arc::new(Jar::default()),
        }
    }
}

/// Read/write key-value and row-store service backing one session.
///
/// Implementations must be safe for concurrent use; concurrent writers of the same
/// variable race benignly (last writer wins).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Session variable, `None` when unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Sets a session variable.
    fn set_var(&self, name: &str, value: &str);

    /// Single value from the persisted row store.
    async fn row_value(
        &self,
        column: &str,
        table: &str,
        key: RowKey<'_>,
    ) -> Result<Option<String>, StoreError>;

    /// Current network identity.
    fn identity(&self) -> NetworkIdentity;

    /// Name of the project driving this session.
    fn project_name(&self) -> String;

    /// Session variable with empty values folded into `None`.
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}
