use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub ok: bool,
    pub version: String,
    /// `available` when the OCR engine initialized, `unavailable` otherwise.
    pub ocr: String,
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
    let ocr = if state.ocr_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthData {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: ocr.to_string(),
    })
}
