//! WalletWise onboarding core.
//!
//! The progression state machine behind a personal-finance app's first-run
//! setup, plus the collaborators it is wired to: durable flag and profile
//! stores, a pluggable auth capability, and best-effort remote profile sync.

pub mod auth;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod profile;
pub mod store;
pub mod sync;
