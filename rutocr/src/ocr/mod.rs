//! OCR (Optical Character Recognition) Module
//!
//! Turns a downloaded image into recognized text:
//! - `preprocess_file` / `preprocess_image` prepare the image (grayscale,
//!   contrast stretch, median denoise, sharpen, width cap) with `image` and
//!   `imageproc`
//! - `TextRecognizer` is the seam the pipeline calls; `OcrProvider` implements
//!   it on top of Tesseract via leptess, leasing engines from a bounded pool
//!
//! # Configuration
//!
//! Engine behavior is controlled via `OcrConfig` (see `config.rs`):
//! - `languages`: Tesseract language string, e.g. `spa` or `spa+eng`
//! - `page_seg_mode`: defaults to 6, a single uniform block of text
//! - `dpi`: source resolution hint passed after each image is set
//! - `char_whitelist`: optional restriction of the output alphabet
//! - `timeout_secs`: upper bound for one recognition, excluding the wait for
//!   a free engine
//! - `workers`: number of engines, i.e. recognitions that may run at once
//! - `max_width`: preprocessing width cap
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr)?;
//! let buffer = preprocess_file(&path, &config.ocr).await?;
//! let result = ocr.recognize(&buffer).await?;
//! ```

mod pool;
mod preprocessing;
mod provider;

pub use preprocessing::{preprocess_file, preprocess_image};
pub use provider::{
    tracing_progress_sink, OcrProvider, ProgressSink, RecognitionProgress, TextRecognizer,
};
