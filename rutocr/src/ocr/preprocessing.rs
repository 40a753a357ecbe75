use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Luma};
use imageproc::filter::{median_filter, sharpen3x3};

use crate::config::OcrConfig;
use crate::error::{Result, RutOcrError};

/// Share of darkest/lightest pixels ignored when stretching contrast.
const STRETCH_CUTOFF_PERCENT: u64 = 1;

/// Read the temp artifact at `path` and preprocess it on the blocking pool.
pub async fn preprocess_file(path: &Path, config: &OcrConfig) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    let max_width = config.max_width;

    tokio::task::spawn_blocking(move || preprocess_image(&bytes, max_width))
        .await
        .map_err(|e| RutOcrError::Internal(format!("Preprocessing task panicked: {e}")))?
}

/// Preprocess image bytes for OCR
///
/// Applies, in order:
/// 1. Alpha flattening onto white, then grayscale conversion
/// 2. Contrast normalization (histogram stretch)
/// 3. Median filter denoising (radius 1)
/// 4. 3x3 sharpening
/// 5. Downscale to at most `max_width` pixels wide, never upscaling
///
/// # Returns
/// Processed image bytes as PNG, ready for the OCR engine
pub fn preprocess_image(bytes: &[u8], max_width: u32) -> Result<Vec<u8>> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RutOcrError::ImageDecode(format!("Failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| RutOcrError::ImageDecode(format!("Failed to decode image: {e}")))?;

    let gray = to_grayscale(img);
    let gray = normalize_contrast(gray);
    let gray = median_filter(&gray, 1, 1);
    let gray = sharpen3x3(&gray);
    let gray = limit_width(gray, max_width);

    let mut output = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| RutOcrError::ImageDecode(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Grayscale conversion. Transparent regions are composited onto white so
/// dark text on a transparent background stays legible.
fn to_grayscale(img: DynamicImage) -> GrayImage {
    if !img.color().has_alpha() {
        return img.to_luma8();
    }

    let rgba = img.to_rgba8();
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        // Rec. 601 luma, same weights as `to_luma8`.
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let blended = luma * alpha + 255.0 * (1.0 - alpha);
        Luma([blended.round().clamp(0.0, 255.0) as u8])
    })
}

/// Stretch the histogram so the darkest and lightest percentiles map to 0 and 255
fn normalize_contrast(gray: GrayImage) -> GrayImage {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return gray;
    }

    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let cutoff = total * STRETCH_CUTOFF_PERCENT / 100;
    let low = percentile_bound(histogram.iter().enumerate(), cutoff);
    let high = percentile_bound(histogram.iter().enumerate().rev(), cutoff);

    // Flat image: nothing to stretch
    if high <= low {
        return gray;
    }

    let range = (high - low) as f32;
    let mut stretched = gray;
    for pixel in stretched.pixels_mut() {
        let value = pixel[0].clamp(low, high);
        pixel[0] = ((value - low) as f32 / range * 255.0).round() as u8;
    }
    stretched
}

/// First intensity whose cumulative count exceeds `cutoff`, walking the
/// histogram in the given direction.
fn percentile_bound<'a, I>(buckets: I, cutoff: u64) -> u8
where
    I: Iterator<Item = (usize, &'a u64)>,
{
    let mut seen = 0u64;
    let mut last = 0usize;
    for (value, count) in buckets {
        last = value;
        seen += count;
        if seen > cutoff {
            break;
        }
    }
    last as u8
}

/// Downscale to `max_width` keeping the aspect ratio; narrower images are untouched
fn limit_width(gray: GrayImage, max_width: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if max_width == 0 || width <= max_width {
        return gray;
    }

    let ratio = max_width as f32 / width as f32;
    let new_height = ((height as f32 * ratio).round() as u32).max(1);

    image::imageops::resize(
        &gray,
        max_width,
        new_height,
        image::imageops::FilterType::Lanczos3,
    )
}
