//! OnboardingStateManager: derives what to show next from live gate state
//! and owns the persisted checkpoint, completion, and reset lifecycle.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::auth::AuthProvider;
use crate::store::keys::{RESET_KEYS, canonical, legacy};
use crate::store::{FlagStore, ProfileStore};

use super::gates::{goals_recorded, name_passes};
use super::progress::OnboardingProgress;
use super::step::{OnboardingGate, OnboardingStep, StepDecision};

/// Coordinates the onboarding lifecycle over injected collaborators.
///
/// Every operation is infallible from the caller's point of view: store
/// failures are logged and degrade to "not done yet", so broken persistence
/// re-shows onboarding rather than silently skipping it.
pub struct OnboardingStateManager {
    flags: Arc<dyn FlagStore>,
    profile: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthProvider>,
}

impl OnboardingStateManager {
    pub fn new(
        flags: Arc<dyn FlagStore>,
        profile: Arc<dyn ProfileStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            flags,
            profile,
            auth,
        }
    }

    // ── Derivation ──────────────────────────────────────────────────

    /// Evaluate the gates in sequence order and return the first step whose
    /// gate fails, or `Complete` when everything passes.
    pub async fn current_decision(&self) -> StepDecision {
        for step in OnboardingStep::ALL {
            if !self.step_satisfied(step).await {
                return StepDecision::Pending(step);
            }
        }
        StepDecision::Complete
    }

    async fn step_satisfied(&self, step: OnboardingStep) -> bool {
        match step.gate() {
            Some(gate) => self.gate_passes(gate).await,
            None => self.transaction_recorded().await,
        }
    }

    /// Evaluate a single gate against live collaborator state.
    pub async fn gate_passes(&self, gate: OnboardingGate) -> bool {
        match gate {
            OnboardingGate::EmailVerification => self.auth.is_email_verified().await,
            OnboardingGate::NameCollection => match self.candidate_name().await {
                Some(name) => name_passes(&name),
                None => false,
            },
            OnboardingGate::CurrencySelection => {
                self.currency_step_confirmed().await && self.stored_currency().await.is_some()
            }
            OnboardingGate::GoalSelection => {
                let multi = self.profile_goals().await;
                let legacy_goal = self.flag_string(legacy::SELECTED_GOAL).await;
                let recorded = goals_recorded(multi.as_deref(), legacy_goal.as_deref());
                let confirmed = match self.canonical_bool(canonical::GOALS_SELECTED).await {
                    Some(value) => value,
                    // Legacy profiles never wrote the canonical flag.
                    None => recorded,
                };
                confirmed && recorded
            }
        }
    }

    /// Name the gate sees: the stored profile name when non-empty, else the
    /// display name a verified social provider asserted. A stored name that
    /// fails the predicate is not papered over by the social name.
    async fn candidate_name(&self) -> Option<String> {
        let stored = match self.profile.name().await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to read profile name: {}", e);
                String::new()
            }
        };
        if !stored.trim().is_empty() {
            return Some(stored);
        }
        self.auth.verified_display_name().await
    }

    /// Currency-step flag. A canonical value wins when present, including an
    /// explicit false; only an absent canonical key consults the booleans
    /// older builds wrote.
    async fn currency_step_confirmed(&self) -> bool {
        match self.canonical_bool(canonical::CURRENCY_SELECTED).await {
            Some(value) => value,
            None => {
                self.flag_bool(legacy::HAS_COMPLETED_CURRENCY_SELECTION).await
                    || self.flag_bool(legacy::HAS_SET_PRIMARY_CURRENCY).await
            }
        }
    }

    async fn stored_currency(&self) -> Option<String> {
        match self.profile.primary_currency_code().await {
            Ok(code) => code.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read primary currency: {}", e);
                None
            }
        }
    }

    async fn profile_goals(&self) -> Option<String> {
        match self.profile.goals().await {
            Ok(goals) => goals,
            Err(e) => {
                warn!("Failed to read goals: {}", e);
                None
            }
        }
    }

    async fn transaction_recorded(&self) -> bool {
        match self.profile.transaction_count().await {
            Ok(count) => count > 0,
            Err(e) => {
                warn!("Failed to count transactions: {}", e);
                false
            }
        }
    }

    async fn wallet_count(&self) -> u64 {
        match self.profile.wallet_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count wallets: {}", e);
                0
            }
        }
    }

    // ── Progress checkpoint ─────────────────────────────────────────

    pub async fn progress(&self) -> OnboardingProgress {
        match self.flag_value(canonical::PROGRESS).await {
            Some(value) => OnboardingProgress::from_value(&value),
            None => OnboardingProgress::default(),
        }
    }

    pub async fn set_progress(&self, progress: OnboardingProgress) {
        self.set_flag(canonical::PROGRESS, json!(progress.value()))
            .await;
    }

    /// Record that the user confirmed `step` and move the checkpoint past
    /// it. Steps whose gate reads a confirmation flag get that flag set
    /// here; the others are confirmed by profile data alone.
    pub async fn record_step_completion(&self, step: OnboardingStep) {
        match step {
            OnboardingStep::CurrencySelection => {
                self.set_flag(canonical::CURRENCY_SELECTED, json!(true)).await;
            }
            OnboardingStep::GoalSelection => {
                self.set_flag(canonical::GOALS_SELECTED, json!(true)).await;
            }
            _ => {}
        }
        let progress = OnboardingProgress::after_completing(step);
        self.set_progress(progress).await;
        info!("Onboarding step {} completed, progress {}", step, progress);
    }

    // ── Completion lifecycle ────────────────────────────────────────

    /// Whether onboarding was ever marked fully complete. Reads the
    /// canonical flag, falling back to the legacy key when absent.
    pub async fn is_marked_complete(&self) -> bool {
        match self.canonical_bool(canonical::COMPLETED).await {
            Some(value) => value,
            None => self.flag_bool(legacy::HAS_COMPLETED_ONBOARDING).await,
        }
    }

    /// Whether a resuming session should show onboarding. True until
    /// `mark_complete()`, true again after `reset()`.
    pub async fn should_show_on_resume(&self) -> bool {
        !self.is_marked_complete().await
    }

    /// Mark onboarding fully complete and mirror the legacy booleans so
    /// readers that predate the canonical keys keep working.
    pub async fn mark_complete(&self) {
        self.set_flag(canonical::COMPLETED, json!(true)).await;
        self.set_flag(canonical::COMPLETED_AT, json!(Utc::now().to_rfc3339()))
            .await;
        self.set_flag(legacy::HAS_COMPLETED_ONBOARDING, json!(true)).await;
        self.set_flag(legacy::HAS_COMPLETED_CURRENCY_SELECTION, json!(true))
            .await;
        self.set_flag(legacy::HAS_SET_PRIMARY_CURRENCY, json!(true)).await;
        info!("Onboarding marked complete");
    }

    /// Clear every onboarding key: canonical, legacy mirrors, and the
    /// dependent app-level flags. Profile data is untouched.
    pub async fn reset(&self) {
        for key in RESET_KEYS {
            if let Err(e) = self.flags.delete(key).await {
                warn!("Failed to clear flag {} on reset: {}", key, e);
            }
        }
        info!("Onboarding state reset");
    }

    /// Deleted-account recovery, run after every successful sign-in.
    ///
    /// A backend account deleted and re-registered behind a surviving local
    /// session leaves stale completion evidence in the flag store. When the
    /// profile is empty (no wallets, no transactions, no currency) but the
    /// flags claim progress or completion, the claim is stale: reset and
    /// report true so the host re-runs onboarding. Otherwise mark the
    /// session active.
    pub async fn reconcile_sign_in(&self) -> bool {
        if !self.auth.is_authenticated().await {
            return false;
        }

        let empty_profile = !self.transaction_recorded().await
            && self.wallet_count().await == 0
            && self.stored_currency().await.is_none();
        let stale_evidence =
            self.is_marked_complete().await || self.progress().await.value() > 0;

        if empty_profile && stale_evidence {
            info!("Empty profile with stale onboarding evidence, resetting");
            self.reset().await;
            return true;
        }

        self.set_flag(canonical::SESSION_ACTIVE, json!(true)).await;
        false
    }

    /// Aggregate snapshot for the status endpoint.
    pub async fn status(&self) -> OnboardingStatus {
        OnboardingStatus {
            should_show: self.should_show_on_resume().await,
            completed: self.is_marked_complete().await,
            decision: self.current_decision().await,
            progress: self.progress().await,
        }
    }

    // ── Flag helpers ────────────────────────────────────────────────

    async fn flag_value(&self, key: &str) -> Option<Value> {
        match self.flags.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read flag {}: {}", key, e);
                None
            }
        }
    }

    /// Canonical keys are written as real booleans; anything else stored
    /// under them counts as absent, not false.
    async fn canonical_bool(&self, key: &str) -> Option<bool> {
        self.flag_value(key).await.as_ref().and_then(Value::as_bool)
    }

    async fn flag_bool(&self, key: &str) -> bool {
        self.canonical_bool(key).await.unwrap_or(false)
    }

    async fn flag_string(&self, key: &str) -> Option<String> {
        self.flag_value(key)
            .await
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    async fn set_flag(&self, key: &str, value: Value) {
        if let Err(e) = self.flags.set(key, value).await {
            warn!("Failed to write flag {}: {}", key, e);
        }
    }
}

/// Onboarding status returned by the REST endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub should_show: bool,
    pub completed: bool,
    pub decision: StepDecision,
    pub progress: OnboardingProgress,
}
