use axum::http::StatusCode;
use thiserror::Error;

pub const LABEL_MISSING_URL: &str = "Falta imageUrl";
pub const LABEL_INVALID_CONTENT_TYPE: &str = "La URL no devuelve una imagen (content-type inválido)";
pub const LABEL_UNSUPPORTED_IMAGE: &str = "Imagen no soportada por el procesador";
pub const LABEL_INTERNAL: &str = "Error interno";

/// Placeholder reported when the remote server sent no content type at all.
pub const UNKNOWN_CONTENT_TYPE: &str = "desconocido";

#[derive(Error, Debug)]
pub enum RutOcrError {
    #[error("Missing imageUrl")]
    MissingImageUrl,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid content type: {observed}")]
    InvalidContentType { observed: String },

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("OCR error: {0}")]
    Recognition(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RutOcrError {
    /// HTTP status the error maps to at the request boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            RutOcrError::MissingImageUrl
            | RutOcrError::InvalidBody(_)
            | RutOcrError::InvalidContentType { .. }
            | RutOcrError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            RutOcrError::Fetch(_)
            | RutOcrError::Http(_)
            | RutOcrError::UrlParse(_)
            | RutOcrError::Recognition(_)
            | RutOcrError::OcrUnavailable(_)
            | RutOcrError::Io(_)
            | RutOcrError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, machine-stable label placed in the `error` field.
    pub fn label(&self) -> &'static str {
        match self {
            RutOcrError::MissingImageUrl | RutOcrError::InvalidBody(_) => LABEL_MISSING_URL,
            RutOcrError::InvalidContentType { .. } => LABEL_INVALID_CONTENT_TYPE,
            RutOcrError::ImageDecode(_) => LABEL_UNSUPPORTED_IMAGE,
            _ => LABEL_INTERNAL,
        }
    }

    /// Free-text diagnostic placed in the `detalle` field.
    pub fn detail(&self) -> Option<String> {
        match self {
            RutOcrError::MissingImageUrl => None,
            RutOcrError::InvalidBody(msg)
            | RutOcrError::ImageDecode(msg)
            | RutOcrError::Fetch(msg)
            | RutOcrError::Recognition(msg)
            | RutOcrError::OcrUnavailable(msg)
            | RutOcrError::Internal(msg) => Some(msg.clone()),
            RutOcrError::InvalidContentType { observed } => Some(observed.clone()),
            RutOcrError::Http(e) => Some(e.to_string()),
            RutOcrError::UrlParse(e) => Some(format!("Invalid URL: {e}")),
            RutOcrError::Io(e) => Some(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RutOcrError>;
