mod fetch;
mod pipeline;
mod rut;
mod temp;
mod text;

pub use fetch::ImageFetcher;
pub use pipeline::OcrPipeline;
pub use rut::{collect_ruts, extract_rut_candidates, extract_ruts, normalize_rut};
pub use temp::TempArtifact;
pub use text::normalize_text;
