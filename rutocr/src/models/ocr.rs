use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RutOcrError;

/// Body of `POST /ocr`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    /// Absolute URL of the image to scan. Non-string values count as missing.
    #[serde(default, deserialize_with = "string_or_none")]
    pub image_url: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

impl OcrRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
        }
    }

    /// The requested URL, or `None` when it is absent or blank.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Downloaded resource, owned by a single pipeline run.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedImage {
    pub fn is_image(&self) -> bool {
        is_image_content_type(self.content_type.as_deref())
    }
}

/// `image/*`, compared case-insensitively. A missing header is not an image.
pub fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
}

/// Raw engine output. `confidence` is whatever the engine reports.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub raw_text: String,
    pub confidence: f32,
}

/// Response of `POST /ocr`.
///
/// Success carries `texto`, `ruts` and `confidence`; failure carries `error`
/// and usually `detalle`. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OcrResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalle: Option<String>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl OcrResponse {
    pub fn success(texto: String, ruts: Vec<String>, confidence: f32) -> Self {
        Self {
            ok: true,
            texto: Some(texto),
            ruts: Some(ruts),
            confidence: Some(confidence),
            error: None,
            detalle: None,
            status: StatusCode::OK,
        }
    }

    pub fn failure(
        status: StatusCode,
        error: impl Into<String>,
        detalle: Option<String>,
    ) -> Self {
        Self {
            ok: false,
            texto: None,
            ruts: None,
            confidence: None,
            error: Some(error.into()),
            detalle,
            status,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<RutOcrError> for OcrResponse {
    fn from(err: RutOcrError) -> Self {
        OcrResponse::failure(err.status(), err.label(), err.detail())
    }
}
