//! SQLite-backed session store.
//!
//! Session variables live in memory; identity rows are persisted in SQLite with:
//! - WAL mode enabled for concurrent access
//! - Automatic database file creation
//! - Schema managed by SQLx migrations in `migrations/`

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{LazyLock, RwLock};

use async_trait::async_trait;
use log::{error, info};
use regex::Regex;
use sqlx::{Pool, Row, Sqlite, SqlitePool};

use super::{NetworkIdentity, RowKey, SessionStore};
use crate::error_handling::StoreError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

fn checked_identifier(name: &str) -> Result<&str, StoreError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

/// Runs SQLx migrations located in the `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}

/// Session store whose rows are persisted in SQLite.
pub struct SqliteSessionStore {
    pool: SqlitePool,
    vars: RwLock<HashMap<String, String>>,
    identity: NetworkIdentity,
    project: String,
}

impl SqliteSessionStore {
    /// Opens (creating if needed) the database at `db_path` and applies migrations.
    pub async fn open(
        db_path: &Path,
        identity: NetworkIdentity,
        project: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let db_path_str = db_path.to_string_lossy().to_string();
        match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&db_path_str)
        {
            Ok(_) => info!("Session database created at {db_path_str}"),
            Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                error!("Failed to create session database file: {e}");
                return Err(StoreError::FileCreationError(e.to_string()));
            }
        }

        let pool = SqlitePool::connect(&format!("sqlite:{db_path_str}"))
            .await
            .map_err(|e| {
                error!("Failed to connect to session database: {e}");
                StoreError::SqlError(e)
            })?;

        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;

        Self::from_pool(pool, identity, project).await
    }

    /// Wraps an existing pool, applying migrations.
    pub async fn from_pool(
        pool: SqlitePool,
        identity: NetworkIdentity,
        project: impl Into<String>,
    ) -> Result<Self, StoreError> {
        run_migrations(&pool).await?;
        Ok(Self {
            pool,
            vars: RwLock::new(HashMap::new()),
            identity,
            project: project.into(),
        })
    }

    /// Inserts or updates a single column of the row selected by `key`.
    pub async fn set_row_value(
        &self,
        table: &str,
        key: RowKey<'_>,
        column: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let table = checked_identifier(table)?;
        let key_column = checked_identifier(key.column)?;
        let column = checked_identifier(column)?;

        let sql = format!(
            "INSERT INTO \"{table}\" (\"{key_column}\", \"{column}\") VALUES (?, ?) \
             ON CONFLICT(\"{key_column}\") DO UPDATE SET \"{column}\" = excluded.\"{column}\""
        );
        sqlx::query(&sql)
            .bind(key.value)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
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
        let table = checked_identifier(table)?;
        let key_column = checked_identifier(key.column)?;
        let column = checked_identifier(column)?;

        let sql =
            format!("SELECT \"{column}\" FROM \"{table}\" WHERE \"{key_column}\" = ? LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(key.value)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>(0)?),
            None => Ok(None),
        }
    }

    fn identity(&self) -> NetworkIdentity {
        self.identity.clone()
    }

    fn project_name(&self) -> String {
        self.project.clone()
    }
}
