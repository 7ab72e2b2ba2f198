//! Config validation with user-friendly error messages.

use crate::schema::{PokedexConfig, ProviderKind};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &PokedexConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_vision(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_server(config: &PokedexConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if server.port == 0 {
        report.warn("server.port", "Port 0 binds a random free port");
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Upload limit must be greater than zero");
    }
}

fn validate_vision(config: &PokedexConfig, report: &mut ValidationReport) {
    let vision = &config.vision;
    if vision.resolved_prompt().trim().is_empty() {
        report.error("vision.prompt", "Prompt cannot be empty");
    }

    match vision.provider {
        ProviderKind::Gemini => {
            let gemini = &vision.gemini;
            if gemini.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                report.error(
                    "vision.gemini.apiKey",
                    "Gemini requires an API key (set GOOGLE_API_KEY)",
                );
            }
            if gemini.model.trim().is_empty() {
                report.error("vision.gemini.model", "Model cannot be empty");
            }
            check_url(&gemini.base_url, "vision.gemini.baseUrl", report);
        }
        ProviderKind::Ollama => {
            let ollama = &vision.ollama;
            if ollama.model.trim().is_empty() {
                report.error("vision.ollama.model", "Model cannot be empty");
            }
            check_url(&ollama.base_url, "vision.ollama.baseUrl", report);
        }
    }
}

fn validate_logging(config: &PokedexConfig, report: &mut ValidationReport) {
    let level = config.logging.level.to_ascii_lowercase();
    let known = ["trace", "debug", "info", "warn", "error", "off"];
    // Directive strings like "pokedex_gateway=debug" are passed through as-is.
    if !level.contains('=') && !known.contains(&level.as_str()) {
        report.warn("logging.level", format!("Unknown log level '{level}'"));
    }
}

fn check_url(url: &str, path: &str, report: &mut ValidationReport) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error(path, "URL must start with http:// or https://");
    }
}
