mod catalog;
mod config;
mod errors;
mod report;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::HttpSimulationApi;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::SimulationSession;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing backend URL or credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting simulator v{}", env!("CARGO_PKG_VERSION"));

    // Initialize backend client
    let api = HttpSimulationApi::new(
        config.api_base_url.clone(),
        config.credential.clone(),
        config.request_timeout,
    )?;
    info!(
        base_url = %config.api_base_url,
        credential = config.credential.kind(),
        "Simulation API client initialized"
    );

    let session = Arc::new(SimulationSession::new(Arc::new(api)));
    if session.refresh_recommendation().await.is_none() {
        info!("Dashboard starting without a recommendation");
    }

    let state = AppState {
        session,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
