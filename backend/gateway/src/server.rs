//! Main HTTP server for the analysis endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use pokedex_core::VisionProvider;

use crate::{analyze, health_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub provider: Arc<dyn VisionProvider>,
    pub prompt: Arc<str>,
    pub max_upload_bytes: usize,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(provider: Arc<dyn VisionProvider>, prompt: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            prompt: prompt.into(),
            max_upload_bytes: 10 * 1024 * 1024,
            started_at: Instant::now(),
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}

/// Build the router with all routes and layers.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/api/analyze", post(analyze::analyze_image))
        // Legacy alias of /api/analyze.
        .route("/api/gemini", post(analyze::analyze_image))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Analysis endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
