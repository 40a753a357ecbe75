#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rutocr::api::{create_router, AppState};
use rutocr::config::{Config, OcrConfig, ProcessingConfig, ServerConfig};
use rutocr::error::{Result, RutOcrError};
use rutocr::models::RecognitionResult;
use rutocr::ocr::TextRecognizer;
use rutocr::processing::OcrPipeline;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// White card with a dark band, roughly the shape of an ID scan.
pub fn card_image(format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(320, 200, |_x, y| {
        if (80..120).contains(&y) {
            Rgb([20, 20, 20])
        } else {
            Rgb([245, 245, 245])
        }
    });

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), format)
        .expect("Failed to encode test image");
    output
}

/// Recognizer returning canned text and counting its invocations.
pub struct StubRecognizer {
    text: String,
    confidence: f32,
    calls: AtomicUsize,
}

impl StubRecognizer {
    pub fn new(text: &str, confidence: f32) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            confidence,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<RecognitionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if image::load_from_memory(image).is_err() {
            return Err(RutOcrError::Recognition(
                "recognizer received an undecodable buffer".to_string(),
            ));
        }
        Ok(RecognitionResult {
            raw_text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

pub fn test_config(tmp_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes: 10 * 1024 * 1024,
        },
        processing: ProcessingConfig {
            tmp_dir: tmp_dir.to_path_buf(),
            debug: true,
            fetch_timeout_secs: 5,
        },
        ocr: OcrConfig::default(),
    }
}

pub fn test_pipeline(recognizer: Arc<dyn TextRecognizer>, tmp_dir: &Path) -> OcrPipeline {
    let config = test_config(tmp_dir);
    OcrPipeline::new(recognizer, &config.processing, &config.ocr)
        .expect("Failed to build pipeline")
}

pub fn test_router(recognizer: Arc<dyn TextRecognizer>, tmp_dir: &Path) -> axum::Router {
    let pipeline = test_pipeline(recognizer, tmp_dir);
    create_router(AppState::new(test_config(tmp_dir), pipeline))
}

/// Serve `body` at `route` with the given content type, expecting exactly `hits` GETs.
pub async fn mount_resource(
    server: &MockServer,
    route: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
    hits: u64,
) {
    let mut response = ResponseTemplate::new(200).set_body_bytes(body);
    if let Some(content_type) = content_type {
        response = response.insert_header("content-type", content_type);
    }

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

pub fn ocr_request(image_url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ocr")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "imageUrl": image_url }).to_string(),
        ))
        .expect("Failed to build request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default()
}

pub fn assert_no_temp_files(dir: &Path) {
    let leftovers = dir_entries(dir);
    assert!(
        leftovers.is_empty(),
        "temp artifacts left behind: {leftovers:?}"
    );
}
