use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::RutOcrError;
use crate::models::OcrResponse;

/// `axum::Json` whose rejections answer with the OCR failure body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(OcrResponse))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for OcrResponse {
    fn from(rejection: JsonRejection) -> Self {
        let err = map_json_rejection(rejection);
        tracing::warn!(error = %err, "Rejected OCR request body");
        err.into()
    }
}

fn map_json_rejection(rejection: JsonRejection) -> RutOcrError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            RutOcrError::InvalidBody(format!("Invalid JSON: {}", err.body_text()))
        }
        JsonRejection::JsonSyntaxError(err) => {
            RutOcrError::InvalidBody(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => RutOcrError::InvalidBody(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(err) => {
            RutOcrError::InvalidBody(format!("Failed to read request body: {}", err.body_text()))
        }
        _ => RutOcrError::InvalidBody(rejection.body_text()),
    }
}
