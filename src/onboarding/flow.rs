//! OnboardingFlow: linear driver over the state manager.
//!
//! The flow owns the step-by-step mechanics (advance, back, the terminal
//! paywall) while the manager owns gate truth. Every transition re-derives
//! from live state, so a flow restarted mid-sequence lands on the right step
//! without replaying anything.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::ProfileStore;
use crate::sync::ProfileSync;

use super::manager::OnboardingStateManager;
use super::step::{OnboardingGate, OnboardingStep, StepDecision};

/// What the host surface should present next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "step", rename_all = "snake_case")]
pub enum FlowEvent {
    ShowStep(OnboardingStep),
    ShowPaywall,
    Finished,
}

/// Drives the onboarding sequence for one user session.
pub struct OnboardingFlow {
    manager: Arc<OnboardingStateManager>,
    profile: Arc<dyn ProfileStore>,
    sync: Arc<dyn ProfileSync>,
}

impl OnboardingFlow {
    pub fn new(
        manager: Arc<OnboardingStateManager>,
        profile: Arc<dyn ProfileStore>,
        sync: Arc<dyn ProfileSync>,
    ) -> Self {
        Self {
            manager,
            profile,
            sync,
        }
    }

    /// What to show on app start or foreground.
    pub async fn resume(&self) -> FlowEvent {
        if self.manager.is_marked_complete().await {
            return FlowEvent::Finished;
        }
        self.surface_decision().await
    }

    /// The user confirmed `step`: record it, then surface what follows.
    /// Reaching the end of the gates surfaces the paywall, not `Finished`;
    /// completion is only persisted by `finish()`.
    pub async fn complete_step(&self, step: OnboardingStep) -> FlowEvent {
        self.manager.record_step_completion(step).await;
        self.surface_decision().await
    }

    /// Step back once from where the checkpoint points. The target step is
    /// shown even though its gate already passes; the email step is the
    /// exception and stays skipped while its gate holds.
    pub async fn go_back(&self) -> FlowEvent {
        let progress = self.manager.progress().await.back();
        self.manager.set_progress(progress).await;

        let mut target = OnboardingStep::from_position(progress.value());
        if target == OnboardingStep::EmailConfirmation
            && self
                .manager
                .gate_passes(OnboardingGate::EmailVerification)
                .await
        {
            target = OnboardingStep::NameCollection;
        }
        FlowEvent::ShowStep(target)
    }

    /// Terminal action behind the paywall: persist completion, push the
    /// profile snapshot in the background, and hand control back to the app.
    /// The push is best-effort; completion never waits on the network.
    pub async fn finish(&self) -> FlowEvent {
        self.manager.mark_complete().await;

        match self.profile.snapshot().await {
            Ok(snapshot) => {
                let sync = self.sync.clone();
                tokio::spawn(async move {
                    if let Err(e) = sync.sync_profile(&snapshot).await {
                        warn!("Profile sync failed: {}", e);
                    }
                });
            }
            Err(e) => {
                warn!("Failed to snapshot profile for sync: {}", e);
            }
        }

        FlowEvent::Finished
    }

    async fn surface_decision(&self) -> FlowEvent {
        match self.manager.current_decision().await {
            StepDecision::Pending(step) => FlowEvent::ShowStep(step),
            StepDecision::Complete => FlowEvent::ShowPaywall,
        }
    }
}
