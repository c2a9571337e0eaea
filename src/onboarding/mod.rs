//! Onboarding progression core.
//!
//! A linear multi-step setup sequence (name, currency, goals, first
//! transaction) gated by persisted flags and live profile data. The state
//! manager derives what to show next from gate truth; the flow drives the
//! sequence step by step and owns the terminal paywall and completion. Both
//! survive restarts by construction: nothing is replayed, every resume
//! re-derives from the stores.

pub mod flow;
pub mod gates;
pub mod manager;
pub mod progress;
pub mod routes;
pub mod step;

pub use flow::{FlowEvent, OnboardingFlow};
pub use manager::{OnboardingStateManager, OnboardingStatus};
pub use progress::OnboardingProgress;
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use step::{OnboardingGate, OnboardingStep, StepDecision};
