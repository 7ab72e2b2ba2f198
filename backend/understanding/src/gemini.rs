//! Google Gemini `generateContent` vision provider.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pokedex_core::{VisionProvider, VisionRequest, VisionResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiVision {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Result<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            anyhow::bail!("Gemini returned no answer: {}", reason);
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            anyhow::bail!("Gemini candidate contained no text");
        }
        Ok(text)
    }
}

#[async_trait]
impl VisionProvider for GeminiVision {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let start = Instant::now();
        info!(model = %self.model, mime = %request.mime_type, "Describing image via Gemini");

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: &request.prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &request.mime_type,
                            data: &request.image_base64,
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {}: {}", status, error_body);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;
        let text = parsed.into_text()?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(latency_ms, chars = text.len(), "Gemini answered");

        Ok(VisionResponse {
            text,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Option<(Option<String>, Value)>>>;

    async fn spawn_fake(reply: Value, status: u16) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let app = Router::new()
            .route(
                "/v1beta/models/gemini-2.0-flash:generateContent",
                post(
                    move |State(cap): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let key = headers
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            *cap.lock().unwrap() = Some((key, body));
                            (
                                axum::http::StatusCode::from_u16(status).unwrap(),
                                Json(reply),
                            )
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}"), captured)
    }

    fn request() -> VisionRequest {
        VisionRequest {
            prompt: "What card is this?".into(),
            image_base64: "/9j/4AA=".into(),
            mime_type: "image/jpeg".into(),
        }
    }

    #[tokio::test]
    async fn sends_prompt_and_inline_image() {
        let reply = json!({"candidates": [{"content": {"parts": [
            {"text": "Card Name: Pikachu\n"}, {"text": "Rarity: Common"}
        ]}}]});
        let (url, captured) = spawn_fake(reply, 200).await;

        let provider = GeminiVision::new("AIzaTest").with_base_url(url);
        let resp = provider.describe(&request()).await.unwrap();
        assert_eq!(resp.text, "Card Name: Pikachu\nRarity: Common");
        assert_eq!(resp.provider, "gemini");

        let (key, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(key.as_deref(), Some("AIzaTest"));
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "What card is this?");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "/9j/4AA=");
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let (url, _) = spawn_fake(json!({"error": {"message": "API key not valid"}}), 400).await;
        let provider = GeminiVision::new("bad").with_base_url(url);
        let err = provider.describe(&request()).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn blocked_prompt_is_error() {
        let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let (url, _) = spawn_fake(reply, 200).await;
        let provider = GeminiVision::new("AIzaTest").with_base_url(url);
        let err = provider.describe(&request()).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
