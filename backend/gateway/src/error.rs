//! HTTP error mapping.
//!
//! Every failure leaves the endpoint as `{"error": "<message>"}`. Only the
//! missing-image case carries a specific message; processing failures share
//! one generic text and their cause stays in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use pokedex_core::AnalysisError;

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Image too large";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("upload exceeds the configured body limit")]
    PayloadTooLarge,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Analysis(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.public_message(),
            Self::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_classes() {
        assert_eq!(ApiError::from(AnalysisError::NoImage).status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(AnalysisError::Encoding("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to analyze image");

        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
