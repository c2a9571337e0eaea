use std::path::Path;
use std::sync::Arc;

use walletwise::auth::{AuthProvider, DisabledAuth, SimulatedAuth};
use walletwise::config::{AppConfig, AuthMode};
use walletwise::onboarding::{
    OnboardingFlow, OnboardingRouteState, OnboardingStateManager, onboarding_routes,
};
use walletwise::store::{FlagStore, LibSqlBackend, ProfileStore};
use walletwise::sync::{HttpProfileSync, NoopSync, ProfileSync};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("💰 WalletWise v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path);
    eprintln!("   Auth: {}", config.auth_mode);
    eprintln!(
        "   Sync: {}",
        config.sync_endpoint.as_deref().unwrap_or("disabled")
    );
    eprintln!(
        "   API: http://0.0.0.0:{}/api/onboarding/status\n",
        config.listen_port
    );

    let backend = open_backend(&config).await?;
    let flags: Arc<dyn FlagStore> = backend.clone();
    let profile: Arc<dyn ProfileStore> = backend;

    let auth: Arc<dyn AuthProvider> = match config.auth_mode {
        AuthMode::Disabled => Arc::new(DisabledAuth),
        AuthMode::Simulated => Arc::new(SimulatedAuth::signed_in()),
    };

    let sync: Arc<dyn ProfileSync> = match &config.sync_endpoint {
        Some(endpoint) => Arc::new(HttpProfileSync::new(endpoint.clone())),
        None => Arc::new(NoopSync),
    };

    let manager = Arc::new(OnboardingStateManager::new(flags, profile.clone(), auth));
    let flow = Arc::new(OnboardingFlow::new(manager.clone(), profile.clone(), sync));

    // The demo binary is its own host: reconcile the ambient session once
    // at startup, the way the app shell would after sign-in.
    if manager.reconcile_sign_in().await {
        eprintln!("   Stale onboarding state detected and reset\n");
    }

    let app = onboarding_routes(OnboardingRouteState {
        manager,
        flow,
        profile,
    })
    .layer(tower_http::cors::CorsLayer::permissive());

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.listen_port)).await?;
    tracing::info!(port = config.listen_port, "Onboarding API started");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_backend(config: &AppConfig) -> walletwise::error::Result<Arc<LibSqlBackend>> {
    let backend = if config.db_path == ":memory:" {
        LibSqlBackend::new_memory().await?
    } else {
        LibSqlBackend::new_local(Path::new(&config.db_path)).await?
    };
    Ok(Arc::new(backend))
}
