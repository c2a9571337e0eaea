//! Integration tests for the HTTP profile sync collaborator.
//!
//! Each test runs a capture endpoint on a random port and points
//! `HttpProfileSync` at it.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

use walletwise::auth::DisabledAuth;
use walletwise::error::SyncError;
use walletwise::onboarding::{FlowEvent, OnboardingFlow, OnboardingStateManager};
use walletwise::profile::ProfileSnapshot;
use walletwise::store::{MemoryFlagStore, MemoryProfileStore, ProfileStore};
use walletwise::sync::{HttpProfileSync, ProfileSync};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

async fn capture_profile(
    State(tx): State<mpsc::Sender<Value>>,
    Json(body): Json<Value>,
) -> StatusCode {
    tx.send(body).await.ok();
    StatusCode::NO_CONTENT
}

async fn rejecting_profile() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

/// Start a capture server; returns its port and the captured-body channel.
async fn start_capture_server() -> (u16, mpsc::Receiver<Value>) {
    let (tx, rx) = mpsc::channel(8);
    let app = Router::new()
        .route("/profiles", post(capture_profile))
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, rx)
}

fn snapshot() -> ProfileSnapshot {
    ProfileSnapshot {
        name: "Jo Smith".to_string(),
        primary_currency_code: Some("USD".to_string()),
        goals: Some("save_more,pay_debt".to_string()),
        wallet_count: 1,
        transaction_count: 3,
    }
}

#[tokio::test]
async fn pushes_the_snapshot_as_json() {
    timeout(TEST_TIMEOUT, async {
        let (port, mut rx) = start_capture_server().await;
        let sync = HttpProfileSync::new(format!("http://127.0.0.1:{port}/profiles"));

        sync.sync_profile(&snapshot()).await.unwrap();

        let body = rx.recv().await.expect("capture channel closed");
        assert_eq!(body["name"], "Jo Smith");
        assert_eq!(body["primary_currency_code"], "USD");
        assert_eq!(body["transaction_count"], 3);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_success_statuses_surface_as_rejections() {
    timeout(TEST_TIMEOUT, async {
        let app = Router::new().route("/profiles", post(rejecting_profile));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let sync = HttpProfileSync::new(format!("http://127.0.0.1:{port}/profiles"));
        let err = sync.sync_profile(&snapshot()).await.unwrap_err();

        match err {
            SyncError::Rejected { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_endpoints_surface_as_request_errors() {
    timeout(TEST_TIMEOUT, async {
        // Bind a port, then drop the listener so the connection is refused.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sync = HttpProfileSync::new(format!("http://127.0.0.1:{port}/profiles"));
        let err = sync.sync_profile(&snapshot()).await.unwrap_err();
        assert!(matches!(err, SyncError::Request(_)), "got {err:?}");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn finishing_the_flow_pushes_over_http() {
    timeout(TEST_TIMEOUT, async {
        let (port, mut rx) = start_capture_server().await;

        let flags = Arc::new(MemoryFlagStore::new());
        let profile = Arc::new(MemoryProfileStore::new());
        profile.set_name("Jo Smith").await.unwrap();
        profile.set_primary_currency("EUR").await.unwrap();

        let manager = Arc::new(OnboardingStateManager::new(
            flags,
            profile.clone(),
            Arc::new(DisabledAuth),
        ));
        let flow = OnboardingFlow::new(
            manager,
            profile,
            Arc::new(HttpProfileSync::new(format!(
                "http://127.0.0.1:{port}/profiles"
            ))),
        );

        assert_eq!(flow.finish().await, FlowEvent::Finished);

        let body = rx.recv().await.expect("capture channel closed");
        assert_eq!(body["name"], "Jo Smith");
        assert_eq!(body["primary_currency_code"], "EUR");
    })
    .await
    .expect("test timed out");
}
