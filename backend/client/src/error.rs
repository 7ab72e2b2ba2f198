use thiserror::Error;

/// Message used when the endpoint rejects a request without a readable reason.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Failed to analyze image";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The image could not be packaged for upload; nothing was sent.
    #[error("cannot upload image with MIME type \"{mime_type}\"")]
    InvalidImage { mime_type: String },

    /// The request never produced a response (connection refused, reset, ...).
    #[error("request to analysis endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidImage { .. } => None,
        }
    }
}
