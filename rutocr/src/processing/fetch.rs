use std::time::Duration;

use url::Url;

use crate::error::{Result, RutOcrError, UNKNOWN_CONTENT_TYPE};
use crate::models::{is_image_content_type, FetchedImage};

/// Single-attempt HTTP GET of the image to scan.
#[derive(Clone, Debug)]
pub struct ImageFetcher {
    http_client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("rutocr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RutOcrError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Request `url` and return once the response headers are in.
    ///
    /// Connection, DNS, timeout and non-2xx failures are all errors; there is
    /// no retry. The body is left unread so callers can reject on the
    /// content type without downloading it.
    pub async fn fetch(&self, url: &str) -> Result<RemoteImage> {
        let url = Url::parse(url)?;
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RutOcrError::Fetch(format!(
                "Remote server responded with {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(RemoteImage {
            response,
            content_type,
        })
    }
}

/// Successful response whose body has not been read yet.
#[derive(Debug)]
pub struct RemoteImage {
    response: reqwest::Response,
    content_type: Option<String>,
}

impl RemoteImage {
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_image(&self) -> bool {
        is_image_content_type(self.content_type())
    }

    /// Consume the response, returning the observed content type or
    /// `desconocido` when the server sent none.
    pub fn into_content_type(self) -> String {
        self.content_type
            .unwrap_or_else(|| UNKNOWN_CONTENT_TYPE.to_string())
    }

    /// Download the body.
    pub async fn download(self) -> Result<FetchedImage> {
        let bytes = self.response.bytes().await?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type: self.content_type,
        })
    }
}
