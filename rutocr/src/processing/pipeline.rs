use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{OcrConfig, ProcessingConfig};
use crate::error::{Result, RutOcrError};
use crate::models::{OcrRequest, OcrResponse, RecognitionResult};
use crate::ocr::{preprocess_file, TextRecognizer};

use super::fetch::ImageFetcher;
use super::rut::extract_ruts;
use super::temp::TempArtifact;
use super::text::normalize_text;

/// Runs one image through fetch → validate → persist → preprocess →
/// recognize → normalize → extract.
///
/// [`OcrPipeline::run`] never fails: every error becomes an [`OcrResponse`]
/// carrying its status code. The temp artifact of a run is removed before
/// `run` returns, whichever step failed.
#[derive(Clone)]
pub struct OcrPipeline {
    fetcher: ImageFetcher,
    recognizer: Arc<dyn TextRecognizer>,
    ocr_config: OcrConfig,
    tmp_dir: PathBuf,
    debug: bool,
}

impl OcrPipeline {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        processing: &ProcessingConfig,
        ocr: &OcrConfig,
    ) -> Result<Self> {
        Ok(Self {
            fetcher: ImageFetcher::new(processing.fetch_timeout_secs)?,
            recognizer,
            ocr_config: ocr.clone(),
            tmp_dir: processing.tmp_dir.clone(),
            debug: processing.debug,
        })
    }

    pub fn recognizer(&self) -> &Arc<dyn TextRecognizer> {
        &self.recognizer
    }

    pub async fn run(&self, request: &OcrRequest) -> OcrResponse {
        let Some(url) = request.image_url() else {
            tracing::warn!("OCR request without imageUrl");
            return RutOcrError::MissingImageUrl.into();
        };

        let started = Instant::now();
        tracing::info!(image_url = %url, "Processing OCR request");

        match self.process(url).await {
            Ok(response) => {
                tracing::info!(
                    image_url = %url,
                    ruts = response.ruts.as_ref().map_or(0, Vec::len),
                    confidence = response.confidence,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "OCR request completed"
                );
                response
            }
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!(image_url = %url, error = %e, "OCR request failed");
                } else {
                    tracing::warn!(image_url = %url, error = %e, "OCR request rejected");
                }
                e.into()
            }
        }
    }

    async fn process(&self, url: &str) -> Result<OcrResponse> {
        let mut artifact = TempArtifact::allocate(&self.tmp_dir, self.debug).await?;
        let outcome = self.process_artifact(url, &mut artifact).await;
        artifact.release().await;
        outcome
    }

    async fn process_artifact(&self, url: &str, artifact: &mut TempArtifact) -> Result<OcrResponse> {
        let remote = self.fetcher.fetch(url).await?;

        if !remote.is_image() {
            return Err(RutOcrError::InvalidContentType {
                observed: remote.into_content_type(),
            });
        }

        let fetched = remote.download().await?;
        artifact.persist(&fetched.bytes).await?;
        drop(fetched);

        let buffer = preprocess_file(artifact.path(), &self.ocr_config).await?;
        let recognition = self.recognizer.recognize(&buffer).await?;

        Ok(assemble_response(recognition))
    }
}

fn assemble_response(recognition: RecognitionResult) -> OcrResponse {
    let texto = normalize_text(&recognition.raw_text);
    let ruts = extract_ruts(&texto);
    OcrResponse::success(texto, ruts, recognition.confidence)
}
