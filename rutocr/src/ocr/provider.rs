use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leptess::{LepTess, Variable};
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, RutOcrError};
use crate::models::RecognitionResult;

use super::pool::{EngineFactory, EnginePool};

/// Progress notification emitted while a recognition runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionProgress {
    pub status: &'static str,
    pub progress: f32,
}

pub type ProgressSink = Arc<dyn Fn(RecognitionProgress) + Send + Sync>;

/// Sink that writes every progress event to the log.
pub fn tracing_progress_sink() -> ProgressSink {
    Arc::new(|event: RecognitionProgress| {
        info!(
            target: "rutocr::ocr::progress",
            status = event.status,
            progress = event.progress,
            "OCR progress"
        );
    })
}

/// Turns an OCR-ready image buffer into text plus a confidence score.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<RecognitionResult>;

    fn is_available(&self) -> bool {
        true
    }
}

enum OcrBackend {
    Local { engines: Arc<EnginePool<LepTess>> },
    Unavailable { reason: String },
}

/// Tesseract-backed [`TextRecognizer`].
///
/// Each recognition checks an engine out of a pool sized by
/// `OcrConfig::workers` and runs on the blocking pool, so requests only wait
/// on each other once every engine is busy. The timeout covers the
/// recognition itself, not the wait for an engine. When Tesseract cannot be
/// initialized (missing library or language data) the provider still
/// constructs and every recognition fails with [`RutOcrError::OcrUnavailable`].
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
    progress: Option<ProgressSink>,
}

fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    let mut lt =
        LepTess::new(config.data_path.as_deref(), &config.languages).map_err(|e| e.to_string())?;

    lt.set_variable(
        Variable::TesseditPagesegMode,
        &config.page_seg_mode.to_string(),
    )
    .map_err(|e| format!("Failed to set page segmentation mode: {e}"))?;
    lt.set_variable(Variable::PreserveInterwordSpaces, "1")
        .map_err(|e| format!("Failed to preserve interword spaces: {e}"))?;

    if let Some(whitelist) = config.char_whitelist.as_deref() {
        lt.set_variable(Variable::TesseditCharWhitelist, whitelist)
            .map_err(|e| format!("Failed to set character whitelist: {e}"))?;
    }

    Ok(lt)
}

fn recognize_with(
    lt: &mut LepTess,
    image: &[u8],
    dpi: i32,
    progress: Option<&ProgressSink>,
) -> Result<RecognitionResult> {
    let emit = |status, value| {
        if let Some(sink) = progress {
            sink(RecognitionProgress {
                status,
                progress: value,
            });
        }
    };

    emit("loading image", 0.0);
    lt.set_image_from_mem(image)
        .map_err(|e| RutOcrError::Recognition(format!("Failed to set image: {e}")))?;
    // Resolution has to be set after the image.
    lt.set_source_resolution(dpi);

    emit("recognizing text", 0.5);
    let raw_text = lt
        .get_utf8_text()
        .map_err(|e| RutOcrError::Recognition(format!("Failed to extract text: {e}")))?;
    let confidence = lt.mean_text_conf() as f32;
    emit("recognized text", 1.0);

    Ok(RecognitionResult {
        raw_text,
        confidence,
    })
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let backend = match create_tesseract(config) {
            Ok(lt) => {
                info!(
                    languages = %config.languages,
                    psm = config.page_seg_mode,
                    dpi = config.dpi,
                    workers = config.workers,
                    "Tesseract OCR initialized"
                );
                let engine_config = config.clone();
                let factory: EngineFactory<LepTess> =
                    Arc::new(move || create_tesseract(&engine_config));
                OcrBackend::Local {
                    engines: Arc::new(EnginePool::new(config.workers, factory).with_engine(lt)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Ok(Self {
            backend,
            config: config.clone(),
            progress: None,
        })
    }

    /// Forward progress events to `sink`.
    pub fn with_progress_sink(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }
}

#[async_trait]
impl TextRecognizer for OcrProvider {
    async fn recognize(&self, image: &[u8]) -> Result<RecognitionResult> {
        let engines = match &self.backend {
            OcrBackend::Local { engines } => engines,
            OcrBackend::Unavailable { reason } => {
                return Err(RutOcrError::OcrUnavailable(reason.clone()))
            }
        };

        let lease = engines.checkout().await?;

        let bytes = image.to_vec();
        let dpi = self.config.dpi;
        let progress = self.progress.clone();
        let job = lease.run(move |lt| recognize_with(lt, &bytes, dpi, progress.as_ref()));

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(timeout_duration, job).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(RutOcrError::Recognition(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    fn is_available(&self) -> bool {
        OcrProvider::is_available(self)
    }
}

impl Clone for OcrProvider {
    fn clone(&self) -> Self {
        let backend = match &self.backend {
            OcrBackend::Local { engines } => OcrBackend::Local {
                engines: Arc::clone(engines),
            },
            OcrBackend::Unavailable { reason } => OcrBackend::Unavailable {
                reason: reason.clone(),
            },
        };

        Self {
            backend,
            config: self.config.clone(),
            progress: self.progress.clone(),
        }
    }
}
