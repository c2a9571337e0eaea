//! Persisted progress checkpoint.

use serde::{Deserialize, Serialize};

use super::step::OnboardingStep;

/// Upper bound of the checkpoint: one past the last step position.
pub const MAX_PROGRESS: u8 = OnboardingStep::ALL.len() as u8;

/// How far the linear flow has gotten, 0..=5.
///
/// Completing the step at position `i` records `i + 1`; stepping back
/// records `i - 1` with a floor of 0. The checkpoint is advisory: live gate
/// evaluation decides what to show on every resume.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OnboardingProgress(u8);

impl OnboardingProgress {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_PROGRESS))
    }

    /// Tolerant read of a persisted checkpoint. Older builds stored it as a
    /// bare integer, a float, or a numeric string; anything unreadable
    /// counts as no progress.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let raw = if let Some(n) = value.as_i64() {
            n.clamp(0, MAX_PROGRESS as i64) as u8
        } else if let Some(f) = value.as_f64() {
            f.clamp(0.0, MAX_PROGRESS as f64) as u8
        } else if let Some(s) = value.as_str() {
            s.trim().parse::<u8>().unwrap_or(0)
        } else {
            0
        };
        Self::new(raw)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Checkpoint recorded after completing `step`.
    pub fn after_completing(step: OnboardingStep) -> Self {
        Self::new(step.position() + 1)
    }

    /// Checkpoint after one back transition.
    pub fn back(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Whether every step position has been completed.
    pub fn is_full(&self) -> bool {
        self.0 == MAX_PROGRESS
    }
}

impl std::fmt::Display for OnboardingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
