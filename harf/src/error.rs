use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarfError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    /// The request body could not be read (too large, aborted stream).
    #[error("Invalid request body: {0}")]
    Body(#[from] axum::extract::rejection::BytesRejection),

    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Morphology error: {0}")]
    Morphology(String),

    /// The engine backend cannot serve any request. Aborts a correction pass.
    #[error("Morphology unavailable: {0}")]
    MorphologyUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl HarfError {
    pub fn status(&self) -> StatusCode {
        match self {
            HarfError::Validation(_) => StatusCode::BAD_REQUEST,
            HarfError::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HarfError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, HarfError>;
