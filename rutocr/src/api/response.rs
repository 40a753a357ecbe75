use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::models::OcrResponse;

impl IntoResponse for OcrResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
