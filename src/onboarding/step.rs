//! Step and gate vocabulary for the onboarding sequence.

use serde::{Deserialize, Serialize};

/// The ordered steps of the onboarding sequence.
///
/// Progresses linearly: EmailConfirmation → NameCollection →
/// CurrencySelection → GoalSelection → TransactionAddition. Email
/// confirmation stays in the order even though the disabled-auth build always
/// skips it, so re-enabling a live auth provider needs no sequence change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    EmailConfirmation,
    NameCollection,
    CurrencySelection,
    GoalSelection,
    TransactionAddition,
}

impl OnboardingStep {
    /// All steps in sequence order.
    pub const ALL: [OnboardingStep; 5] = [
        Self::EmailConfirmation,
        Self::NameCollection,
        Self::CurrencySelection,
        Self::GoalSelection,
        Self::TransactionAddition,
    ];

    /// Zero-based position in the sequence.
    pub fn position(&self) -> u8 {
        match self {
            Self::EmailConfirmation => 0,
            Self::NameCollection => 1,
            Self::CurrencySelection => 2,
            Self::GoalSelection => 3,
            Self::TransactionAddition => 4,
        }
    }

    /// Step at a given position, clamped to the last step.
    pub fn from_position(position: u8) -> OnboardingStep {
        match position {
            0 => Self::EmailConfirmation,
            1 => Self::NameCollection,
            2 => Self::CurrencySelection,
            3 => Self::GoalSelection,
            _ => Self::TransactionAddition,
        }
    }

    /// The gate that must pass to move beyond this step, if the step is
    /// gated by a named predicate. `TransactionAddition` is gated by the
    /// existence of a first transaction instead.
    pub fn gate(&self) -> Option<OnboardingGate> {
        match self {
            Self::EmailConfirmation => Some(OnboardingGate::EmailVerification),
            Self::NameCollection => Some(OnboardingGate::NameCollection),
            Self::CurrencySelection => Some(OnboardingGate::CurrencySelection),
            Self::GoalSelection => Some(OnboardingGate::GoalSelection),
            Self::TransactionAddition => None,
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EmailConfirmation => "email_confirmation",
            Self::NameCollection => "name_collection",
            Self::CurrencySelection => "currency_selection",
            Self::GoalSelection => "goal_selection",
            Self::TransactionAddition => "transaction_addition",
        };
        write!(f, "{s}")
    }
}

/// Named boolean predicates over external state, one per gated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingGate {
    EmailVerification,
    NameCollection,
    CurrencySelection,
    GoalSelection,
}

impl std::fmt::Display for OnboardingGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EmailVerification => "email_verification",
            Self::NameCollection => "name_collection",
            Self::CurrencySelection => "currency_selection",
            Self::GoalSelection => "goal_selection",
        };
        write!(f, "{s}")
    }
}

/// Outcome of deriving the next step from live gate state.
///
/// `Complete` is an explicit variant. Callers match on it instead of
/// comparing against a trailing step standing in for "done".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum StepDecision {
    Pending(OnboardingStep),
    Complete,
}

impl StepDecision {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The pending step, if any.
    pub fn step(&self) -> Option<OnboardingStep> {
        match self {
            Self::Pending(step) => Some(*step),
            Self::Complete => None,
        }
    }
}
