use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Trait for multimodal models that turn an image plus an instruction into text.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one image with its instruction and return the generated text.
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse>;
}

/// Request to a vision provider. The image is already base64-encoded.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: String,
    pub image_base64: String,
    pub mime_type: String,
}

/// Response from a vision provider.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Outcome of one successful analysis, as kept by the endpoint for logging.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

impl From<VisionResponse> for AnalysisResult {
    fn from(resp: VisionResponse) -> Self {
        Self {
            text: resp.text,
            provider: resp.provider,
            model: resp.model,
            latency_ms: resp.latency_ms,
        }
    }
}
