//! Default values applied when the config file and environment are silent.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Largest accepted upload body. Phone camera JPEGs sit well under this.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:latest";

/// Prompt preset used when none is configured.
pub const DEFAULT_PROMPT: &str = "card-sorting";

pub const DEFAULT_LOG_LEVEL: &str = "info";
