mod ocr;

pub use ocr::*;
