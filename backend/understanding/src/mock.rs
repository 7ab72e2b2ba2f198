use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use pokedex_core::{VisionProvider, VisionRequest, VisionResponse};

/// A vision provider that returns a canned answer or a canned failure.
/// Counts calls and keeps the last request so callers can assert what
/// reached it.
pub struct MockVision {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<VisionRequest>>,
}

impl MockVision {
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::new(Ok(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Err(message.into()))
    }

    fn new(reply: Result<String, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request passed to [`VisionProvider::describe`].
    pub fn last_request(&self) -> Option<VisionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl VisionProvider for MockVision {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());
        match &self.reply {
            Ok(text) => Ok(VisionResponse {
                text: text.clone(),
                provider: "mock".to_string(),
                model: "mock".to_string(),
                latency_ms: 0,
            }),
            Err(message) => anyhow::bail!("{}", message),
        }
    }
}
