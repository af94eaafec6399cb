// src/main.rs

use std::sync::Arc;

use allocation_sidecar::{
    api::HttpDistributionApi,
    engine::{AllocationSession, SessionSettings},
    router, AppState, Config,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    // Backend client + the one session this sidecar hosts
    let api = Arc::new(HttpDistributionApi::new(&config)?);
    let session = Arc::new(AllocationSession::new(api, SessionSettings::from_config(&config)));
    let state = AppState { session };

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, backend = %config.api_base, "allocation sidecar listening");

    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}
