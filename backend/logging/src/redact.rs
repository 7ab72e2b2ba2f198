//! Log Redaction
//!
//! Scrubs API keys and access tokens from strings prior to logging. Provider
//! errors can echo the request URL, and Gemini keys may travel as `?key=`.

use once_cell::sync::Lazy;
use regex::Regex;

static GOOGLE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z\-_]{20,}").unwrap());
static KEY_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());
static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = KEY_PARAM_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    BEARER_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "POST https://example.com/v1beta/models/x:generateContent?key=AIzaSyA1234567890abcdefghijkl failed";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AIzaSy"));
        assert!(clean.contains("?key=[REDACTED]"));

        let clean = redact_sensitive_data("auth Bearer eyJhbGciOiJIUzI1NiJ9 rejected");
        assert!(!clean.contains("eyJhbGci"));
    }

    #[test]
    fn leaves_plain_text() {
        assert_eq!(redact_sensitive_data("Card Name: Pikachu"), "Card Name: Pikachu");
    }
}
