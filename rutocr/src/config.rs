use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Characters Tesseract may emit by default: alphanumerics (including Spanish
/// accented letters), whitespace and the separators a RUT is written with.
pub const DEFAULT_CHAR_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyzÁÉÍÓÚÜÑáéíóúüñ.-: ";

/// Tesseract engines kept for concurrent recognitions: one per core, at most four.
fn default_ocr_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .min(4)
}

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// `OCR_CHAR_WHITELIST` unset keeps the default set, an empty value disables it.
fn parse_whitelist() -> Option<String> {
    match env::var("OCR_CHAR_WHITELIST") {
        Ok(val) if val.is_empty() => None,
        Ok(val) => Some(val),
        Err(_) => Some(DEFAULT_CHAR_WHITELIST.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub processing: ProcessingConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingConfig {
    /// Directory that holds the per-request temp artifacts.
    pub tmp_dir: PathBuf,
    /// Routes recognition progress and cleanup warnings to the log.
    pub debug: bool,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub languages: String,
    pub data_path: Option<String>,
    pub page_seg_mode: u8,
    pub dpi: i32,
    pub char_whitelist: Option<String>,
    pub timeout_secs: u64,
    pub max_width: u32,
    /// Upper bound on recognitions running at the same time.
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            tmp_dir: PathBuf::from("tmp"),
            debug: false,
            fetch_timeout_secs: 30,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "spa".to_string(),
            data_path: None,
            page_seg_mode: 6,
            dpi: 300,
            char_whitelist: Some(DEFAULT_CHAR_WHITELIST.to_string()),
            timeout_secs: 60,
            max_width: 1200,
            workers: default_ocr_workers(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 3000),
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", 10 * 1024 * 1024),
            },
            processing: ProcessingConfig {
                tmp_dir: env::var("TMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("tmp")),
                debug: parse_env_or("DEBUG_OCR", false),
                fetch_timeout_secs: parse_env_or("FETCH_TIMEOUT", 30),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "spa".to_string()),
                data_path: env::var("OCR_DATA_PATH").ok(),
                page_seg_mode: parse_env_or("OCR_PAGE_SEG_MODE", 6),
                dpi: parse_env_or("OCR_DPI", 300),
                char_whitelist: parse_whitelist(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
                max_width: parse_env_or("OCR_MAX_WIDTH", 1200),
                workers: parse_env_or("OCR_WORKERS", default_ocr_workers()).max(1),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
