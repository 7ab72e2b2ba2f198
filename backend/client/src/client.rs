//! HTTP submission client for the analysis endpoint.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use tracing::{debug, warn};

use pokedex_core::CapturedImage;

use crate::error::{ClientError, DEFAULT_REJECTION_MESSAGE};

/// Route the endpoint serves analysis on.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Anything that can turn one image into analysis text.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, image: &CapturedImage) -> Result<String, ClientError>;
}

/// Fire-once multipart uploader. No retries and no timeout are configured.
#[derive(Clone)]
pub struct AnalysisClient {
    http: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl AnalysisClient {
    /// Client for a full endpoint URL, e.g. `http://localhost:3000/api/analyze`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Client for a server base URL; the analyze route is appended.
    pub fn for_server(base_url: &str) -> Self {
        Self::new(format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH))
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload the image and return the response body verbatim.
    pub async fn analyze(&self, image: &CapturedImage) -> Result<String, ClientError> {
        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|_| ClientError::InvalidImage {
                mime_type: image.mime_type.clone(),
            })?;
        let form = Form::new().part("image", part);

        debug!(endpoint = %self.endpoint, bytes = image.len(), "Submitting image");
        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
            warn!(status = status.as_u16(), message = %message, "Analysis request rejected");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Submitter for AnalysisClient {
    async fn submit(&self, image: &CapturedImage) -> Result<String, ClientError> {
        self.analyze(image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use pokedex_gateway::{build_router, GatewayState};
    use pokedex_understanding::MockVision;
    use std::sync::Arc;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn photo() -> CapturedImage {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(10 * 1024, 7);
        CapturedImage::new(data)
    }

    #[tokio::test]
    async fn round_trip_returns_exact_text() {
        let answer = "Card Name: Charizard\nRarity: Holo Rare\n  Condition: Unclear (glare)";
        let provider = Arc::new(MockVision::with_response(answer));
        let base = serve(build_router(GatewayState::new(provider.clone(), "prompt"))).await;

        let text = AnalysisClient::for_server(&base).analyze(&photo()).await.unwrap();
        assert_eq!(text, answer);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_message_is_propagated() {
        let provider = Arc::new(MockVision::failing("upstream exploded"));
        let base = serve(build_router(GatewayState::new(provider, "prompt"))).await;

        let err = AnalysisClient::for_server(&base).analyze(&photo()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Failed to analyze image");
    }

    #[tokio::test]
    async fn unreadable_error_body_uses_default_message() {
        let app = Router::new().route(
            ANALYZE_PATH,
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
        );
        let base = serve(app).await;

        let err = AnalysisClient::for_server(&base).analyze(&photo()).await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 502, .. }));
        assert_eq!(err.to_string(), DEFAULT_REJECTION_MESSAGE);
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = AnalysisClient::for_server(&format!("http://{addr}"))
            .analyze(&photo())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn unparseable_mime_type_fails_before_sending() {
        let provider = Arc::new(MockVision::with_response("unused"));
        let base = serve(build_router(GatewayState::new(provider.clone(), "prompt"))).await;

        let image = photo().with_mime_type("not a mime type");
        let err = AnalysisClient::for_server(&base).analyze(&image).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidImage { .. }));
        assert_eq!(err.status(), None);
        assert_eq!(provider.calls(), 0);
    }
}
