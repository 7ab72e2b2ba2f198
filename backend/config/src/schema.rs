//! Pokedex runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section has defaults, so
//! an empty file (or no file) yields a usable config.

use serde::{Deserialize, Serialize};

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PokedexConfig {
    /// HTTP server for the analysis endpoint
    pub server: ServerConfig,

    /// Vision provider selection and credentials
    pub vision: VisionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

/// Which backend answers analysis requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" | "local" => Ok(Self::Ollama),
            other => Err(format!("unknown vision provider: {other}")),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => f.write_str("gemini"),
            Self::Ollama => f.write_str("ollama"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionConfig {
    pub provider: ProviderKind,
    /// Either a preset name (`card-sorting`, `describe`) or literal prompt text.
    pub prompt: String,
    pub gemini: GeminiConfig,
    pub ollama: OllamaConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            prompt: DEFAULT_PROMPT.to_string(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl VisionConfig {
    /// The instruction text sent with every image.
    pub fn resolved_prompt(&self) -> &str {
        pokedex_core::prompt::preset(&self.prompt).unwrap_or(&self.prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily-rolling NDJSON log. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let cfg: PokedexConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, PokedexConfig::default());
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.vision.gemini.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "vision:\n  provider: ollama\n  ollama:\n    model: llava\n";
        let cfg: PokedexConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.vision.provider, ProviderKind::Ollama);
        assert_eq!(cfg.vision.ollama.model, "llava");
        assert_eq!(cfg.vision.ollama.base_url, DEFAULT_OLLAMA_BASE_URL);
    }

    #[test]
    fn prompt_preset_or_literal() {
        let mut vision = VisionConfig::default();
        assert!(vision.resolved_prompt().contains("Pokémon card sorting assistant"));
        vision.prompt = "What is in the photo?".into();
        assert_eq!(vision.resolved_prompt(), "What is in the photo?");
    }
}
