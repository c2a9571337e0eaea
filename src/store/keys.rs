//! Flag-store keys: the canonical namespace plus legacy aliases.

/// User ID the durable backend scopes rows to (single-user app).
pub const DEFAULT_USER: &str = "default";

/// Canonical keys owned by the onboarding core.
pub mod canonical {
    /// Progress checkpoint (integer 0..=5).
    pub const PROGRESS: &str = "onboarding.progress";
    /// Onboarding fully completed (bool).
    pub const COMPLETED: &str = "onboarding.completed";
    /// RFC 3339 timestamp of completion.
    pub const COMPLETED_AT: &str = "onboarding.completed_at";
    /// The user confirmed the currency step (bool).
    pub const CURRENCY_SELECTED: &str = "onboarding.currency_selected";
    /// The user confirmed the goal step (bool).
    pub const GOALS_SELECTED: &str = "onboarding.goals_selected";
    /// The post-onboarding welcome toast was already shown (bool).
    pub const WELCOME_SHOWN: &str = "app.welcome_shown";
    /// A signed-in session is active (bool).
    pub const SESSION_ACTIVE: &str = "app.session_active";
}

/// Keys written by older builds. Read only when the canonical key is absent,
/// and mirrored on completion so older readers keep working. Never an
/// independent truth source once a canonical key exists.
pub mod legacy {
    pub const HAS_COMPLETED_ONBOARDING: &str = "hasCompletedOnboarding";
    pub const HAS_COMPLETED_CURRENCY_SELECTION: &str = "hasCompletedCurrencySelection";
    pub const HAS_SET_PRIMARY_CURRENCY: &str = "hasSetPrimaryCurrency";
    /// Single goal ID recorded by builds that predate multi-goal selection.
    pub const SELECTED_GOAL: &str = "selectedGoal";
}

/// Every key `reset()` clears, in one place so reset and its tests agree.
pub const RESET_KEYS: &[&str] = &[
    canonical::PROGRESS,
    canonical::COMPLETED,
    canonical::COMPLETED_AT,
    canonical::CURRENCY_SELECTED,
    canonical::GOALS_SELECTED,
    canonical::WELCOME_SHOWN,
    canonical::SESSION_ACTIVE,
    legacy::HAS_COMPLETED_ONBOARDING,
    legacy::HAS_COMPLETED_CURRENCY_SELECTION,
    legacy::HAS_SET_PRIMARY_CURRENCY,
    legacy::SELECTED_GOAL,
];
