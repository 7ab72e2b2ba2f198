//! Health API
//!
//! Reports process liveness and which vision provider answers requests.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "pokedex",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        model: state.provider.model().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::server::{build_router, GatewayState};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use pokedex_understanding::MockVision;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn reports_provider() {
        let state = GatewayState::new(Arc::new(MockVision::with_response("x")), "prompt");
        let resp = build_router(state)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "mock");
    }
}
