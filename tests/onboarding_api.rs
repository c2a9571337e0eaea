//! Integration tests for the onboarding REST API.
//!
//! Each test spins up the Axum router on a random port and drives the
//! sequence over HTTP the way the app shell would.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use walletwise::auth::{AuthProvider, DisabledAuth};
use walletwise::onboarding::{
    OnboardingFlow, OnboardingRouteState, OnboardingStateManager, onboarding_routes,
};
use walletwise::store::{
    FlagStore, LibSqlBackend, MemoryFlagStore, MemoryProfileStore, ProfileStore,
};
use walletwise::sync::NoopSync;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

struct TestApp {
    port: u16,
    handle: tokio::task::JoinHandle<()>,
}

fn build_router(
    flags: Arc<dyn FlagStore>,
    profile: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthProvider>,
) -> axum::Router {
    let manager = Arc::new(OnboardingStateManager::new(flags, profile.clone(), auth));
    let flow = Arc::new(OnboardingFlow::new(
        manager.clone(),
        profile.clone(),
        Arc::new(NoopSync),
    ));
    onboarding_routes(OnboardingRouteState {
        manager,
        flow,
        profile,
    })
}

async fn serve(app: axum::Router) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestApp { port, handle }
}

/// In-memory stores, auth disabled: the default test server.
async fn start_server() -> TestApp {
    let flags = Arc::new(MemoryFlagStore::new());
    let profile = Arc::new(MemoryProfileStore::new());
    serve(build_router(flags, profile, Arc::new(DisabledAuth))).await
}

async fn start_libsql_server(path: &Path) -> TestApp {
    let backend = Arc::new(LibSqlBackend::new_local(path).await.unwrap());
    serve(build_router(
        backend.clone(),
        backend,
        Arc::new(DisabledAuth),
    ))
    .await
}

async fn get_json(client: &reqwest::Client, port: u16, path: &str) -> Value {
    client
        .get(format!("http://127.0.0.1:{port}{path}"))
        .send()
        .await
        .expect("GET failed")
        .json()
        .await
        .expect("invalid JSON")
}

async fn post(client: &reqwest::Client, port: u16, path: &str) -> reqwest::Response {
    client
        .post(format!("http://127.0.0.1:{port}{path}"))
        .send()
        .await
        .expect("POST failed")
}

async fn post_json(
    client: &reqwest::Client,
    port: u16,
    path: &str,
    body: Value,
) -> reqwest::Response {
    client
        .post(format!("http://127.0.0.1:{port}{path}"))
        .json(&body)
        .send()
        .await
        .expect("POST failed")
}

/// POST /api/onboarding/advance for `step` and return the flow event.
async fn advance(client: &reqwest::Client, port: u16, step: &str) -> Value {
    post_json(
        client,
        port,
        "/api/onboarding/advance",
        json!({ "step": step }),
    )
    .await
    .json()
    .await
    .expect("invalid JSON")
}

// ── Happy path ───────────────────────────────────────────────────────

#[tokio::test]
async fn full_onboarding_sequence_over_rest() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        let event = get_json(&client, app.port, "/api/onboarding/resume").await;
        assert_eq!(event["event"], "show_step");
        assert_eq!(event["step"], "name_collection");

        let res = post_json(
            &client,
            app.port,
            "/api/profile/name",
            json!({"name": "Jo Smith"}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let event = advance(&client, app.port, "name_collection").await;
        assert_eq!(event["step"], "currency_selection");

        let res = post_json(
            &client,
            app.port,
            "/api/profile/currency",
            json!({"code": "USD"}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let event = advance(&client, app.port, "currency_selection").await;
        assert_eq!(event["step"], "goal_selection");

        let res = post_json(
            &client,
            app.port,
            "/api/profile/goals",
            json!({"goals": ["save_more", "pay_debt"]}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let event = advance(&client, app.port, "goal_selection").await;
        assert_eq!(event["step"], "transaction_addition");

        let res = post_json(
            &client,
            app.port,
            "/api/wallets",
            json!({"name": "Cash", "currency": "USD"}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let wallet: Value = res.json().await.unwrap();

        let res = post_json(
            &client,
            app.port,
            "/api/transactions",
            json!({
                "wallet_id": wallet["id"],
                "amount": "-12.50",
                "currency": "USD",
                "note": "coffee"
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let event = advance(&client, app.port, "transaction_addition").await;
        assert_eq!(event["event"], "show_paywall");

        let event = post(&client, app.port, "/api/onboarding/finish")
            .await
            .json::<Value>()
            .await
            .unwrap();
        assert_eq!(event["event"], "finished");

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["completed"], json!(true));
        assert_eq!(status["should_show"], json!(false));
        assert_eq!(status["decision"]["state"], "complete");
        assert_eq!(status["progress"], json!(5));

        let profile = get_json(&client, app.port, "/api/profile").await;
        assert_eq!(profile["name"], "Jo Smith");
        assert_eq!(profile["primary_currency_code"], "USD");
        assert_eq!(profile["transaction_count"], json!(1));
    })
    .await
    .expect("test timed out");
}

// ── Reset and back navigation ────────────────────────────────────────

#[tokio::test]
async fn reset_restarts_the_sequence() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        post(&client, app.port, "/api/onboarding/finish").await;
        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["completed"], json!(true));

        let res = post(&client, app.port, "/api/onboarding/reset").await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["completed"], json!(false));
        assert_eq!(status["should_show"], json!(true));
        assert_eq!(status["decision"]["step"], "name_collection");
        assert_eq!(status["progress"], json!(0));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn back_returns_to_the_previous_step() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        post_json(
            &client,
            app.port,
            "/api/profile/name",
            json!({"name": "Jo Smith"}),
        )
        .await;
        advance(&client, app.port, "name_collection").await;

        let event = post(&client, app.port, "/api/onboarding/back")
            .await
            .json::<Value>()
            .await
            .unwrap();
        assert_eq!(event["event"], "show_step");
        assert_eq!(event["step"], "name_collection");

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["progress"], json!(1));
    })
    .await
    .expect("test timed out");
}

// ── Sign-in reconciliation ───────────────────────────────────────────

#[tokio::test]
async fn sign_in_resets_stale_completion_on_an_empty_profile() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        // Completion evidence without any profile data: the deleted-account
        // shape.
        post(&client, app.port, "/api/onboarding/finish").await;

        let body = post(&client, app.port, "/api/session/sign-in")
            .await
            .json::<Value>()
            .await
            .unwrap();
        assert_eq!(body["onboarding_reset"], json!(true));

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["should_show"], json!(true));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn sign_in_keeps_a_populated_profile() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        post_json(
            &client,
            app.port,
            "/api/profile/currency",
            json!({"code": "USD"}),
        )
        .await;
        post(&client, app.port, "/api/onboarding/finish").await;

        let body = post(&client, app.port, "/api/session/sign-in")
            .await
            .json::<Value>()
            .await
            .unwrap();
        assert_eq!(body["onboarding_reset"], json!(false));

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["completed"], json!(true));
    })
    .await
    .expect("test timed out");
}

// ── Input validation ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_step_names_are_rejected() {
    timeout(TEST_TIMEOUT, async {
        let app = start_server().await;
        let client = reqwest::Client::new();

        let res = post_json(
            &client,
            app.port,
            "/api/onboarding/advance",
            json!({"step": "bogus"}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // The surface stays healthy afterwards.
        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["decision"]["step"], "name_collection");
    })
    .await
    .expect("test timed out");
}

// ── Durability ───────────────────────────────────────────────────────

#[tokio::test]
async fn restart_resumes_where_the_user_left_off() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("walletwise.db");
        let client = reqwest::Client::new();

        let app = start_libsql_server(&db_path).await;
        post_json(
            &client,
            app.port,
            "/api/profile/name",
            json!({"name": "Jo Smith"}),
        )
        .await;
        advance(&client, app.port, "name_collection").await;
        post_json(
            &client,
            app.port,
            "/api/profile/currency",
            json!({"code": "EUR"}),
        )
        .await;
        let event = advance(&client, app.port, "currency_selection").await;
        assert_eq!(event["step"], "goal_selection");

        app.handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let app = start_libsql_server(&db_path).await;
        let event = get_json(&client, app.port, "/api/onboarding/resume").await;
        assert_eq!(event["event"], "show_step");
        assert_eq!(event["step"], "goal_selection");

        let status = get_json(&client, app.port, "/api/onboarding/status").await;
        assert_eq!(status["progress"], json!(3));
    })
    .await
    .expect("test timed out");
}
