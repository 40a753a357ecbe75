//! Fetches a remote image, runs Tesseract OCR over it and extracts the
//! Chilean RUT numbers found in the recognized text.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ocr;
pub mod processing;
