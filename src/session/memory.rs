//! In-memory session store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{NetworkIdentity, RowKey, SessionStore};
use crate::config::DEFAULT_USER_AGENT;
use crate::error_handling::StoreError;

type RowId = (String, String, String);

/// Session store keeping variables and rows in process memory.
///
/// Rows are addressed by `(table, key column, key value)`.
pub struct MemorySessionStore {
    vars: RwLock<HashMap<String, String>>,
    rows: RwLock<HashMap<RowId, HashMap<String, String>>>,
    identity: NetworkIdentity,
    project: String,
}

impl MemorySessionStore {
    pub fn new(identity: NetworkIdentity, project: impl Into<String>) -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
            rows: RwLock::new(HashMap::new()),
            identity,
            project: project.into(),
        }
    }

    /// Builder-style variable setter.
    pub fn with_var(self, name: &str, value: &str) -> Self {
        self.set_var(name, value);
        self
    }

    /// Builder-style row value setter.
    pub fn with_row(self, table: &str, key: RowKey<'_>, column: &str, value: &str) -> Self {
        self.set_row_value(table, key, column, value);
        self
    }

    /// Inserts or replaces a single row value.
    pub fn set_row_value(&self, table: &str, key: RowKey<'_>, column: &str, value: &str) {
        let id = (
            table.to_string(),
            key.column.to_string(),
            key.value.to_string(),
        );
        if let Ok(mut rows) = self.rows.write() {
            rows.entry(id)
                .or_default()
                .insert(column.to_string(), value.to_string());
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(NetworkIdentity::new(DEFAULT_USER_AGENT), "default")
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.read().ok()?.get(name).cloned()
    }

    fn set_var(&self, name: &str, value: &str) {
        if let Ok(mut vars) = self.vars.write() {
            vars.insert(name.to_string(), value.to_string());
        }
    }

    async fn row_value(
        &self,
        column: &str,
        table: &str,
        key: RowKey<'_>,
    ) -> Result<Option<String>, StoreError> {
        let id = (
            table.to_string(),
            key.column.to_string(),
            key.value.to_string(),
        );
        Ok(self
            .rows
            .read()
            .ok()
            .and_then(|rows| rows.get(&id).and_then(|row| row.get(column).cloned())))
    }

    fn identity(&self) -> NetworkIdentity {
        self.identity.clone()
    }

    fn project_name(&self) -> String {
        self.project.clone()
    }
}
