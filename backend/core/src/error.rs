use thiserror::Error;

/// Message returned to callers when the upload carries no image.
pub const NO_IMAGE_MESSAGE: &str = "No image provided";

/// Message returned to callers for every processing failure.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image";

/// Top-level error type for an image analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no image provided")]
    NoImage,

    #[error("vision provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("image encoding error: {0}")]
    Encoding(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Whether the failure was caused by the caller's input rather than processing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoImage)
    }

    /// The message that may be shown to the caller. Processing failures all
    /// collapse to the same generic text.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            NO_IMAGE_MESSAGE
        } else {
            ANALYSIS_FAILED_MESSAGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_image_is_a_client_error() {
        assert!(AnalysisError::NoImage.is_client_error());
        let err = AnalysisError::Provider {
            provider: "gemini".into(),
            message: "quota exhausted for key AIza...".into(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), ANALYSIS_FAILED_MESSAGE);
    }
}
