//! User profile and finance domain records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wallet transactions belong to, such as a cash account or savings jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique ID.
    pub id: Uuid,
    /// Display name, e.g. "Cash" or "Joint checking".
    pub name: String,
    /// ISO 4217 code, e.g. "USD".
    pub currency: String,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new wallet with a fresh ID.
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: currency.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single recorded transaction. The sign of `amount` carries direction:
/// negative for spending, positive for income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique ID.
    pub id: Uuid,
    /// Wallet this transaction belongs to.
    pub wallet_id: Uuid,
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// ISO 4217 code.
    pub currency: String,
    /// Optional free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// When the transaction occurred.
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction occurring now.
    pub fn new(wallet_id: Uuid, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            amount,
            currency: currency.into(),
            note: None,
            occurred_at: Utc::now(),
        }
    }

    /// Builder: attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Read-only snapshot of the profile, returned by the status surface and
/// shipped to the remote sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// The user's display name (empty until the name step completes).
    pub name: String,
    /// Primary currency code, once chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_currency_code: Option<String>,
    /// Comma-joined goal IDs, once chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    /// Number of wallets the user has created.
    pub wallet_count: u64,
    /// Number of recorded transactions.
    pub transaction_count: u64,
}
