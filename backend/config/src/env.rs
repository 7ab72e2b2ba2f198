//! Environment variable handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` escapes to a
//!   literal `${VAR}`.
//! - Well-known variables (`GOOGLE_API_KEY`, `POKEDEX_PORT`, ...) that
//!   override the corresponding typed field.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::PokedexConfig;
use crate::validation::ConfigValidationError;

/// Matches `${VAR}` with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree using the
/// process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                error.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply well-known environment overrides from the process environment.
///
/// Returns a warning for every override whose value could not be used.
pub fn apply_env_overrides(config: &mut PokedexConfig) -> Vec<ConfigValidationError> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply well-known environment overrides from a provided map.
pub fn apply_env_overrides_with(
    config: &mut PokedexConfig,
    env: &HashMap<String, String>,
) -> Vec<ConfigValidationError> {
    let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();
    let mut ignored = Vec::new();

    if let Some(bind) = get("POKEDEX_BIND") {
        config.server.bind_address = bind;
    }
    if let Some(port) = get("POKEDEX_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => ignored.push(ConfigValidationError {
                path: "POKEDEX_PORT".to_string(),
                message: format!("Ignoring invalid port \"{port}\""),
            }),
        }
    }
    if let Some(provider) = get("POKEDEX_PROVIDER") {
        match provider.parse() {
            Ok(kind) => config.vision.provider = kind,
            Err(e) => ignored.push(ConfigValidationError {
                path: "POKEDEX_PROVIDER".to_string(),
                message: format!("Ignoring override: {e}"),
            }),
        }
    }
    if let Some(prompt) = get("POKEDEX_PROMPT") {
        config.vision.prompt = prompt;
    }
    if let Some(key) = get("GOOGLE_API_KEY") {
        config.vision.gemini.api_key = Some(key);
    }
    if let Some(url) = get("OLLAMA_URL") {
        config.vision.ollama.base_url = url;
    }
    if let Some(model) = get("POKEDEX_MODEL") {
        match config.vision.provider {
            crate::schema::ProviderKind::Gemini => config.vision.gemini.model = model,
            crate::schema::ProviderKind::Ollama => config.vision.ollama.model = model,
        }
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level;
    }
    if let Some(dir) = get("POKEDEX_LOG_DIR") {
        config.logging.dir = Some(dir);
    }
    ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProviderKind;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"vision": {"gemini": {"apiKey": "${GOOGLE_API_KEY}"}}});
        let env = env(&[("GOOGLE_API_KEY", "AIzaTest")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["vision"]["gemini"]["apiKey"], "AIzaTest");
    }

    #[test]
    fn error_on_missing_var_names_path() {
        let v = json!({"vision": {"gemini": {"apiKey": "${MISSING_VAR}"}}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("vision.gemini.apiKey"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"prompt": "keep $${NOT_A_VAR} as is"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["prompt"], "keep ${NOT_A_VAR} as is");
    }

    #[test]
    fn overrides_apply_to_typed_fields() {
        let env = env(&[
            ("POKEDEX_PORT", "8088"),
            ("POKEDEX_PROVIDER", "ollama"),
            ("POKEDEX_MODEL", "llava:13b"),
            ("GOOGLE_API_KEY", "AIzaKey"),
        ]);
        let mut cfg = PokedexConfig::default();
        let ignored = apply_env_overrides_with(&mut cfg, &env);
        assert!(ignored.is_empty());
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.vision.provider, ProviderKind::Ollama);
        assert_eq!(cfg.vision.ollama.model, "llava:13b");
        assert_eq!(cfg.vision.gemini.api_key.as_deref(), Some("AIzaKey"));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut cfg = PokedexConfig::default();
        let ignored = apply_env_overrides_with(
            &mut cfg,
            &env(&[("POKEDEX_PORT", "http"), ("POKEDEX_PROVIDER", "openai")]),
        );
        assert_eq!(cfg.server.port, crate::defaults::DEFAULT_PORT);
        assert_eq!(cfg.vision.provider, ProviderKind::Gemini);
        let paths: Vec<_> = ignored.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, ["POKEDEX_PORT", "POKEDEX_PROVIDER"]);
        assert!(ignored[0].message.contains("http"));
    }
}
