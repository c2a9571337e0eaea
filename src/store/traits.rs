//! The onboarding core's two collaborator contracts.
//!
//! Both stores are injected into the state manager as trait objects, so
//! unit tests run against the in-memory implementations and the binary
//! against libSQL, with identical semantics: writes are awaited and
//! immediately visible to subsequent reads.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::profile::{ProfileSnapshot, Transaction, Wallet};

/// Durable key→JSON flags surviving process restarts.
///
/// Callers coerce values themselves and treat missing or malformed data as
/// absent. The safe direction for onboarding is "flag not set".
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Get the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Set `key` to `value`, overwriting any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// The user's domain data: name, currency, goals, wallets, transactions.
///
/// The state manager only calls the read half; the write half is the
/// collaborator's own API, driven by the step UI (here, the REST surface).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The user's display name. Empty string until the name step completes.
    async fn name(&self) -> Result<String, StoreError>;

    /// Primary currency code, once chosen.
    async fn primary_currency_code(&self) -> Result<Option<String>, StoreError>;

    /// Comma-joined goal IDs, once chosen.
    async fn goals(&self) -> Result<Option<String>, StoreError>;

    /// Number of recorded transactions.
    async fn transaction_count(&self) -> Result<u64, StoreError>;

    /// Number of wallets the user has created.
    async fn wallet_count(&self) -> Result<u64, StoreError>;

    // ── Host-side writes ────────────────────────────────────────────

    /// Set the user's display name.
    async fn set_name(&self, name: &str) -> Result<(), StoreError>;

    /// Set the primary currency code.
    async fn set_primary_currency(&self, code: &str) -> Result<(), StoreError>;

    /// Replace the chosen goals (stored comma-joined).
    async fn set_goals(&self, goals: &[String]) -> Result<(), StoreError>;

    /// Record a new wallet.
    async fn add_wallet(&self, wallet: &Wallet) -> Result<(), StoreError>;

    /// Record a new transaction.
    async fn add_transaction(&self, tx: &Transaction) -> Result<(), StoreError>;

    /// Snapshot for the status surface and the remote sync collaborator.
    async fn snapshot(&self) -> Result<ProfileSnapshot, StoreError> {
        Ok(ProfileSnapshot {
            name: self.name().await?,
            primary_currency_code: self.primary_currency_code().await?,
            goals: self.goals().await?,
            wallet_count: self.wallet_count().await?,
            transaction_count: self.transaction_count().await?,
        })
    }
}
