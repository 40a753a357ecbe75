use std::sync::Arc;

use crate::config::Config;
use crate::processing::OcrPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: OcrPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: OcrPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }

    pub fn ocr_available(&self) -> bool {
        self.pipeline.recognizer().is_available()
    }
}
