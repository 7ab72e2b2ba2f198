//! Config file discovery and reading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Pokedex config directory.
/// Priority: `POKEDEX_CONFIG_DIR` env > `~/.pokedex/` > `./.pokedex`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("POKEDEX_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".pokedex"),
        None => PathBuf::from(".pokedex"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Pick the config file to load: an explicit path, then `POKEDEX_CONFIG`,
/// then the default location.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("POKEDEX_CONFIG") {
        return PathBuf::from(path);
    }
    config_file_path(&config_dir())
}

/// Read the raw YAML config as a JSON value tree.
///
/// Returns an empty object if the file doesn't exist, so defaults apply.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let value: Option<Value> = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    debug!(path = %path.display(), "Parsed config file");
    Ok(value.unwrap_or_else(|| Value::Object(serde_json::Map::new())))
}
