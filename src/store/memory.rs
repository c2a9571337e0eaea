//! In-memory store implementations.
//!
//! Back the deterministic unit tests and the simulated runtime mode; no
//! durability, same visibility semantics as the libSQL backend (a completed
//! `set` is seen by every later `get`).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::profile::{Transaction, Wallet};
use crate::store::traits::{FlagStore, ProfileStore};

/// In-memory flag store.
#[derive(Default)]
pub struct MemoryFlagStore {
    flags: RwLock<HashMap<String, Value>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let flags = self
            .flags
            .read()
            .map_err(|_| StoreError::Query("flag store lock poisoned".into()))?;
        Ok(flags.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut flags = self
            .flags
            .write()
            .map_err(|_| StoreError::Query("flag store lock poisoned".into()))?;
        flags.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut flags = self
            .flags
            .write()
            .map_err(|_| StoreError::Query("flag store lock poisoned".into()))?;
        Ok(flags.remove(key).is_some())
    }
}

#[derive(Default)]
struct ProfileInner {
    name: String,
    primary_currency: Option<String>,
    goals: Option<String>,
    wallets: Vec<Wallet>,
    transactions: Vec<Transaction>,
}

/// In-memory profile store.
#[derive(Default)]
pub struct MemoryProfileStore {
    inner: RwLock<ProfileInner>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, ProfileInner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Query("profile store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, ProfileInner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Query("profile store lock poisoned".into()))
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn name(&self) -> Result<String, StoreError> {
        Ok(self.read()?.name.clone())
    }

    async fn primary_currency_code(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.primary_currency.clone())
    }

    async fn goals(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.goals.clone())
    }

    async fn transaction_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.transactions.len() as u64)
    }

    async fn wallet_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.wallets.len() as u64)
    }

    async fn set_name(&self, name: &str) -> Result<(), StoreError> {
        self.write()?.name = name.to_string();
        Ok(())
    }

    async fn set_primary_currency(&self, code: &str) -> Result<(), StoreError> {
        self.write()?.primary_currency = Some(code.to_string());
        Ok(())
    }

    async fn set_goals(&self, goals: &[String]) -> Result<(), StoreError> {
        self.write()?.goals = Some(goals.join(","));
        Ok(())
    }

    async fn add_wallet(&self, wallet: &Wallet) -> Result<(), StoreError> {
        self.write()?.wallets.push(wallet.clone());
        Ok(())
    }

    async fn add_transaction(&self, tx: &Transaction) -> Result<(), StoreError> {
        self.write()?.transactions.push(tx.clone());
        Ok(())
    }
}
