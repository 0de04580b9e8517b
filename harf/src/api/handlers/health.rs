use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// Service and engine status.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    /// Whether the morphology engine backend came up at startup.
    pub jvm_started: bool,
    pub morphology_available: bool,
    pub spell_checker_available: bool,
    /// Configured lexicon archive path.
    pub zemberek_jar: String,
    pub morphology_backend: String,
    pub ocr_available: bool,
    pub ocr_model: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let morphology = &state.morphology;

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        jvm_started: morphology.is_started(),
        morphology_available: morphology.has_morphology(),
        spell_checker_available: morphology.has_spell_checker(),
        zemberek_jar: morphology.archive_path().display().to_string(),
        morphology_backend: morphology.backend().to_string(),
        ocr_available: state.ocr.is_available(),
        ocr_model: state.ocr.model().to_string(),
    })
}
