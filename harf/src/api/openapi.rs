use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use crate::correction::{CorrectionMethod, CorrectionOutcome};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Harf API",
        version = "1.0.0",
        description = "Turkish handwriting OCR with morphology-aware spell correction.",
    ),
    paths(handlers::ocr::process_ocr, handlers::health::health_check),
    components(schemas(
        handlers::ocr::OcrRequest,
        handlers::ocr::ErrorBody,
        handlers::health::HealthData,
        CorrectionOutcome,
        CorrectionMethod,
    )),
    tags(
        (name = "ocr", description = "Image text extraction and correction"),
        (name = "health", description = "Health check"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
