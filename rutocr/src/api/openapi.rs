use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "rutocr API",
        description = "Fetches a remote image, runs OCR on it and extracts Chilean RUT numbers.",
    ),
    paths(handlers::ocr::recognize_image, handlers::health::health_check),
    components(schemas(
        models::OcrRequest,
        models::OcrResponse,
        handlers::health::HealthData,
    )),
    tags(
        (name = "ocr", description = "Image text recognition and RUT extraction"),
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
