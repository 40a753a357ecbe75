use axum::extract::State;

use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::models::{OcrRequest, OcrResponse};

/// `POST /ocr`
///
/// Downloads `imageUrl`, recognizes its text and returns the RUTs found in it.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "ocr",
    request_body = OcrRequest,
    responses(
        (status = 200, description = "Recognized text and extracted RUTs", body = OcrResponse),
        (status = 400, description = "Missing URL, non-image content or undecodable image", body = OcrResponse),
        (status = 500, description = "Fetch, OCR engine or I/O failure", body = OcrResponse),
    )
)]
pub async fn recognize_image(
    State(state): State<AppState>,
    AppJson(request): AppJson<OcrRequest>,
) -> OcrResponse {
    state.pipeline.run(&request).await
}
