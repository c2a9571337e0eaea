//! libSQL-backed durable implementation of both store traits.
//!
//! A single local database file holds the flags table and the profile
//! tables, scoped by user ID. Writes are awaited, so a completed `set`
//! is visible to every subsequent read, with no delay workarounds anywhere.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde_json::Value;
use tracing::info;

use crate::error::StoreError;
use crate::profile::{Transaction, Wallet};
use crate::store::keys::DEFAULT_USER;
use crate::store::migrations;
use crate::store::traits::{FlagStore, ProfileStore};

/// libSQL database backend.
///
/// Stores a single connection reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    user_id: String,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Open(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;
        info!(path = %path.display(), "Database opened");

        Ok(Self {
            db: Arc::new(db),
            conn,
            user_id: DEFAULT_USER.to_string(),
        })
    }

    /// Create an in-memory database (for tests and throwaway runs).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        migrations::run_migrations(&conn).await?;

        Ok(Self {
            db: Arc::new(db),
            conn,
            user_id: DEFAULT_USER.to_string(),
        })
    }

    /// Scope all rows to a different user ID.
    pub fn scoped_to(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl FlagStore for LibSqlBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT value FROM flags WHERE user_id = ?1 AND key = ?2",
                params![self.user_id.as_str(), key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get flag: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: Value = serde_json::from_str(&value_str).unwrap_or(Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get flag: {e}"))),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(&value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO flags (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![self.user_id.as_str(), key, value_str, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set flag: {e}")))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let count = self
            .conn()
            .execute(
                "DELETE FROM flags WHERE user_id = ?1 AND key = ?2",
                params![self.user_id.as_str(), key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("delete flag: {e}")))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl ProfileStore for LibSqlBackend {
    async fn name(&self) -> Result<String, StoreError> {
        self.profile_column("name")
            .await
            .map(|v| v.unwrap_or_default())
    }

    async fn primary_currency_code(&self) -> Result<Option<String>, StoreError> {
        self.profile_column("primary_currency").await
    }

    async fn goals(&self) -> Result<Option<String>, StoreError> {
        self.profile_column("goals").await
    }

    async fn transaction_count(&self) -> Result<u64, StoreError> {
        self.count_rows("transactions").await
    }

    async fn wallet_count(&self) -> Result<u64, StoreError> {
        self.count_rows("wallets").await
    }

    async fn set_name(&self, name: &str) -> Result<(), StoreError> {
        self.upsert_profile_column("name", Some(name)).await
    }

    async fn set_primary_currency(&self, code: &str) -> Result<(), StoreError> {
        self.upsert_profile_column("primary_currency", Some(code))
            .await
    }

    async fn set_goals(&self, goals: &[String]) -> Result<(), StoreError> {
        let joined = goals.join(",");
        self.upsert_profile_column("goals", Some(joined.as_str()))
            .await
    }

    async fn add_wallet(&self, wallet: &Wallet) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO wallets (id, user_id, name, currency, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    wallet.id.to_string(),
                    self.user_id.as_str(),
                    wallet.name.as_str(),
                    wallet.currency.as_str(),
                    wallet.created_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("add wallet: {e}")))?;
        Ok(())
    }

    async fn add_transaction(&self, tx: &Transaction) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO transactions (id, user_id, wallet_id, amount, currency, note, occurred_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    tx.id.to_string(),
                    self.user_id.as_str(),
                    tx.wallet_id.to_string(),
                    tx.amount.to_string(),
                    tx.currency.as_str(),
                    opt_text(tx.note.as_deref()),
                    tx.occurred_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("add transaction: {e}")))?;
        Ok(())
    }
}

impl LibSqlBackend {
    /// Read one nullable text column from the user's profile row.
    async fn profile_column(&self, column: &str) -> Result<Option<String>, StoreError> {
        // Column names come from this file only, never from callers.
        let sql = format!("SELECT {column} FROM profiles WHERE user_id = ?1");
        let mut rows = self
            .conn()
            .query(&sql, params![self.user_id.as_str()])
            .await
            .map_err(|e| StoreError::Query(format!("read profile {column}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value: Option<String> = row.get(0).ok();
                Ok(value.filter(|v| !v.is_empty()))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("read profile {column}: {e}"))),
        }
    }

    /// Upsert one column of the user's profile row.
    async fn upsert_profile_column(
        &self,
        column: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let sql = format!(
            "INSERT INTO profiles (user_id, {column}, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id) DO UPDATE SET {column} = ?2, updated_at = ?3"
        );
        self.conn()
            .execute(&sql, params![self.user_id.as_str(), opt_text(value), now])
            .await
            .map_err(|e| StoreError::Query(format!("write profile {column}: {e}")))?;
        Ok(())
    }

    async fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?1");
        let mut rows = self
            .conn()
            .query(&sql, params![self.user_id.as_str()])
            .await
            .map_err(|e| StoreError::Query(format!("count {table}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(row.get::<i64>(0).unwrap_or(0).max(0) as u64),
            _ => Ok(0),
        }
    }
}

/// Convert `Option<&str>` to a libsql value (NULL when absent).
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}
