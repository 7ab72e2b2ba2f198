//! Vision understanding: describe images using a hosted or local multimodal model.

pub mod gemini;
pub mod mock;
pub mod ollama;

use std::sync::Arc;

use pokedex_config::{ProviderKind, VisionConfig};
use pokedex_core::{AnalysisError, VisionProvider};
use tracing::info;

pub use gemini::GeminiVision;
pub use mock::MockVision;
pub use ollama::OllamaVision;

/// Build the provider selected by configuration.
pub fn build_provider(config: &VisionConfig) -> Result<Arc<dyn VisionProvider>, AnalysisError> {
    match config.provider {
        ProviderKind::Gemini => {
            let api_key = config
                .gemini
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AnalysisError::Config("Gemini requires an API key (set GOOGLE_API_KEY)".into())
                })?;
            info!(model = %config.gemini.model, "Using Gemini vision provider");
            Ok(Arc::new(
                GeminiVision::new(api_key)
                    .with_model(&config.gemini.model)
                    .with_base_url(&config.gemini.base_url),
            ))
        }
        ProviderKind::Ollama => {
            info!(
                model = %config.ollama.model,
                url = %config.ollama.base_url,
                "Using Ollama vision provider"
            );
            Ok(Arc::new(
                OllamaVision::new()
                    .with_base_url(&config.ollama.base_url)
                    .with_model(&config.ollama.model),
            ))
        }
    }
}
