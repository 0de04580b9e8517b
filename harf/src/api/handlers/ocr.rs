use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::info;

use crate::api::state::AppState;
use crate::correction::CorrectionOutcome;
use crate::error::{HarfError, Result};

/// Body of `POST /ocr`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct OcrRequest {
    /// Base64-encoded image. A `data:<mime>;base64,` prefix is accepted.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Decodes the `image` field, tolerating a data URL prefix and line breaks.
fn decode_image(image: &str) -> Result<Vec<u8>> {
    let payload = match image.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => image,
    };
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    Ok(STANDARD.decode(cleaned)?)
}

/// `POST /ocr`
///
/// The body is read as raw bytes: any content type is accepted and a JSON
/// parse failure is reported as a 500.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    request_body = OcrRequest,
    responses(
        (status = 200, description = "Recognized and corrected text", body = CorrectionOutcome),
        (status = 400, description = "No image in the request", body = ErrorBody),
        (status = 413, description = "Request body exceeds the configured limit", body = ErrorBody),
        (status = 500, description = "Decoding, OCR or internal failure", body = ErrorBody),
    )
)]
pub async fn process_ocr(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<CorrectionOutcome>> {
    let body = body?;
    let request: OcrRequest = serde_json::from_slice(&body)?;

    let image = request
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| HarfError::Validation("No image data provided".to_string()))?;

    let image_bytes = decode_image(&image)?;
    let raw_text = state.ocr.ocr(&image_bytes).await?;
    let outcome = state.pipeline.run(raw_text).await;

    info!(
        image_bytes = image_bytes.len(),
        raw_chars = outcome.raw_text.chars().count(),
        corrected_chars = outcome.text.chars().count(),
        method = outcome.correction_method.as_str(),
        "OCR request processed"
    );

    Ok(Json(outcome))
}
