//! REST endpoints for driving onboarding and the profile collaborator.
//!
//! The flow endpoints are thin translations of [`OnboardingFlow`] calls; the
//! profile endpoints are the host-side writes each step's UI performs. Flow
//! operations never fail; profile writes surface store errors as 500s.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::profile::{Transaction, Wallet};
use crate::store::ProfileStore;

use super::flow::OnboardingFlow;
use super::manager::OnboardingStateManager;
use super::step::OnboardingStep;

/// Shared state for the onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingStateManager>,
    pub flow: Arc<OnboardingFlow>,
    pub profile: Arc<dyn ProfileStore>,
}

fn store_error(e: StoreError) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": e.to_string()})),
    )
}

// ── Flow endpoints ──────────────────────────────────────────────────

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// GET /api/onboarding/resume
///
/// What the app should present on start or foreground.
async fn get_resume(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.flow.resume().await)
}

#[derive(Debug, Deserialize)]
struct AdvanceRequest {
    step: OnboardingStep,
}

/// POST /api/onboarding/advance
///
/// The UI confirmed a step; returns the next event to present.
async fn post_advance(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<AdvanceRequest>,
) -> impl IntoResponse {
    Json(state.flow.complete_step(req.step).await)
}

/// POST /api/onboarding/back
async fn post_back(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.flow.go_back().await)
}

/// POST /api/onboarding/finish
async fn post_finish(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.flow.finish().await)
}

/// POST /api/onboarding/reset
async fn post_reset(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    state.manager.reset().await;
    StatusCode::NO_CONTENT
}

/// POST /api/session/sign-in
///
/// Runs deleted-account reconciliation; reports whether onboarding state
/// was reset.
async fn post_sign_in(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let reset = state.manager.reconcile_sign_in().await;
    Json(serde_json::json!({ "onboarding_reset": reset }))
}

// ── Profile endpoints ───────────────────────────────────────────────

/// GET /api/profile
async fn get_profile(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    match state.profile.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SetNameRequest {
    name: String,
}

/// POST /api/profile/name
async fn post_name(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<SetNameRequest>,
) -> impl IntoResponse {
    match state.profile.set_name(&req.name).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SetCurrencyRequest {
    code: String,
}

/// POST /api/profile/currency
async fn post_currency(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<SetCurrencyRequest>,
) -> impl IntoResponse {
    match state.profile.set_primary_currency(&req.code).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SetGoalsRequest {
    goals: Vec<String>,
}

/// POST /api/profile/goals
async fn post_goals(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<SetGoalsRequest>,
) -> impl IntoResponse {
    match state.profile.set_goals(&req.goals).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct AddWalletRequest {
    name: String,
    currency: String,
}

/// POST /api/wallets
async fn post_wallet(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<AddWalletRequest>,
) -> impl IntoResponse {
    let wallet = Wallet::new(req.name, req.currency);
    match state.profile.add_wallet(&wallet).await {
        Ok(()) => (StatusCode::CREATED, Json(wallet)).into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct AddTransactionRequest {
    wallet_id: Uuid,
    /// Decimal string, e.g. `"-12.50"`.
    amount: Decimal,
    currency: String,
    note: Option<String>,
}

/// POST /api/transactions
async fn post_transaction(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<AddTransactionRequest>,
) -> impl IntoResponse {
    let mut tx = Transaction::new(req.wallet_id, req.amount, req.currency);
    if let Some(note) = req.note {
        tx = tx.with_note(note);
    }
    match state.profile.add_transaction(&tx).await {
        Ok(()) => (StatusCode::CREATED, Json(tx)).into_response(),
        Err(e) => store_error(e).into_response(),
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/resume", get(get_resume))
        .route("/api/onboarding/advance", post(post_advance))
        .route("/api/onboarding/back", post(post_back))
        .route("/api/onboarding/finish", post(post_finish))
        .route("/api/onboarding/reset", post(post_reset))
        .route("/api/session/sign-in", post(post_sign_in))
        .route("/api/profile", get(get_profile))
        .route("/api/profile/name", post(post_name))
        .route("/api/profile/currency", post(post_currency))
        .route("/api/profile/goals", post(post_goals))
        .route("/api/wallets", post(post_wallet))
        .route("/api/transactions", post(post_transaction))
        .with_state(state)
}
