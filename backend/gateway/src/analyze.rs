//! `POST /api/analyze`: multipart image in, model text out.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
};
use tracing::{error, info, warn};

use pokedex_core::{AnalysisError, AnalysisResult, CapturedImage, VisionProvider, VisionRequest};
use pokedex_logging::{redact_sensitive_data, AnalysisEvent, AnalysisEventLogger};
use pokedex_media::resolve_image_mime;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Name of the form field carrying the upload.
pub const IMAGE_FIELD: &str = "image";

/// Handler for `POST /api/analyze`.
///
/// Returns the provider's text verbatim as `text/plain`.
pub async fn analyze_image(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, ApiError> {
    let request_id = uuid::Uuid::new_v4().to_string();

    let image = match multipart {
        Ok(multipart) => read_image_field(multipart).await,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "Request is not multipart");
            Err(ApiError::Analysis(AnalysisError::NoImage))
        }
    };
    let image = match image {
        Ok(image) => image,
        Err(e) => {
            AnalysisEventLogger::log_event(
                &request_id,
                AnalysisEvent::Rejected { reason: e.to_string() },
            );
            return Err(e);
        }
    };

    AnalysisEventLogger::log_event(
        &request_id,
        AnalysisEvent::Received {
            size_bytes: image.len(),
            mime_type: image.mime_type.clone(),
        },
    );

    match run_analysis(state.provider.as_ref(), &state.prompt, &image).await {
        Ok(result) => {
            AnalysisEventLogger::log_event(
                &request_id,
                AnalysisEvent::Completed {
                    provider: result.provider.clone(),
                    model: result.model.clone(),
                    latency_ms: result.latency_ms,
                    text_chars: result.text.chars().count(),
                },
            );
            Ok(result.text)
        }
        Err(e) => {
            let detail = failure_detail(&e);
            error!(request_id = %request_id, error = %detail, "Error analyzing image");
            AnalysisEventLogger::log_event(&request_id, AnalysisEvent::Failed { error_msg: detail });
            Err(e.into())
        }
    }
}

/// Pull the `image` part out of the form. Other fields are skipped; the first
/// image field wins.
async fn read_image_field(mut multipart: Multipart) -> Result<CapturedImage, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(AnalysisError::NoImage.into()),
            Err(e) => return Err(multipart_error(e.status(), &e.body_text())),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let declared = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e.status(), &e.body_text()))?;

        // Browsers send an empty part when the file input was left blank.
        if data.is_empty() {
            return Err(AnalysisError::NoImage.into());
        }

        let mime = resolve_image_mime(declared.as_deref(), &data);
        let mut image = CapturedImage::new(data).with_mime_type(mime);
        if let Some(name) = file_name.filter(|n| !n.is_empty()) {
            image = image.with_file_name(name);
        }
        return Ok(image);
    }
}

fn multipart_error(status: StatusCode, detail: &str) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(detail, "Upload exceeds body limit");
        ApiError::PayloadTooLarge
    } else {
        warn!(detail, "Malformed multipart body");
        ApiError::Analysis(AnalysisError::NoImage)
    }
}

/// Loggable form of a failure, with keys and tokens scrubbed.
fn failure_detail(e: &AnalysisError) -> String {
    redact_sensitive_data(&e.to_string())
}

/// Encode the image, send it with the fixed prompt and return the model text.
pub async fn run_analysis(
    provider: &dyn VisionProvider,
    prompt: &str,
    image: &CapturedImage,
) -> Result<AnalysisResult, AnalysisError> {
    if image.is_empty() {
        return Err(AnalysisError::NoImage);
    }

    let request = VisionRequest {
        prompt: prompt.to_string(),
        image_base64: image.to_base64(),
        mime_type: image.mime_type.clone(),
    };

    info!(
        provider = provider.name(),
        model = provider.model(),
        bytes = image.len(),
        "Forwarding image to vision provider"
    );

    let response = provider
        .describe(&request)
        .await
        .map_err(|e| AnalysisError::Provider {
            provider: provider.name().to_string(),
            message: format!("{e:#}"),
        })?;

    Ok(response.into())
}
