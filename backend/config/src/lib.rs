//! `pokedex-config`: runtime configuration for the analysis service.
//!
//! Provides:
//! - Typed config schema (server, vision provider, logging)
//! - YAML loading from an explicit path, `POKEDEX_CONFIG` or `~/.pokedex/`
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_raw_config, resolve_config_path};
pub use redact::{redact, redacted_snapshot};
pub use schema::{
    GeminiConfig, LoggingConfig, OllamaConfig, PokedexConfig, ProviderKind, ServerConfig,
    VisionConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A config ready for use, with the problems found while preparing it.
///
/// Loading happens before the logger exists, so nothing is logged here;
/// call [`LoadedConfig::log_report`] once logging is up.
#[derive(Debug)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: PokedexConfig,
    /// Validation results plus any env override that was ignored.
    pub report: ValidationReport,
}

impl LoadedConfig {
    pub fn log_report(&self) {
        tracing::info!(path = %self.path.display(), "Loaded config");
        for warning in &self.report.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }
}

/// Load, substitute env vars, apply env overrides and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// problems are collected in the returned report, not raised; callers that
/// need a hard failure check [`ValidationReport::is_valid`].
pub async fn load_and_prepare(path: Option<&Path>) -> Result<LoadedConfig> {
    let path = resolve_config_path(path);
    let raw = load_raw_config(&path).await?;
    let (config, report) = prepare_with(&raw, &std::env::vars().collect())
        .with_context(|| format!("Invalid config at: {}", path.display()))?;
    Ok(LoadedConfig {
        path,
        config,
        report,
    })
}

/// Turn a raw config tree into a typed config using the given environment.
pub fn prepare_with(
    raw: &Value,
    env: &HashMap<String, String>,
) -> Result<(PokedexConfig, ValidationReport)> {
    let value = resolve_env_vars_with(raw, env).context("Failed to resolve env vars in config")?;
    let mut config: PokedexConfig = serde_json::from_value(value)?;

    let ignored = apply_env_overrides_with(&mut config, env);

    let mut report = validate(&config);
    report.warnings.extend(ignored);
    Ok((config, report))
}
