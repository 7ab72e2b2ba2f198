//! Local Ollama vision provider (`/api/generate` with inline images).

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pokedex_core::{VisionProvider, VisionRequest, VisionResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:latest";

pub struct OllamaVision {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaVision {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OllamaVision {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: [&'a str; 1],
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl VisionProvider for OllamaVision {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let start = Instant::now();
        info!(model = %self.model, base_url = %self.base_url, "Describing image via Ollama");

        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            images: [&request.image_base64],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Ollama HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {}: {}", status, error_body);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(latency_ms, "Ollama answered");

        Ok(VisionResponse {
            text: parsed.response,
            provider: "ollama".to_string(),
            model: self.model.clone(),
            latency_ms,
        })
    }
}
