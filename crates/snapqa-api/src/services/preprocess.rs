//! Optional upload pre-processing
//!
//! Pure bytes-to-bytes transformation: decode the validated JPEG, downscale
//! to a bounded width preserving aspect ratio, and re-encode at a reduced
//! quality factor to control the payload sent upstream. The re-encoded
//! output gets its own ceiling check.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use snapqa_core::AppError;

#[derive(Debug, Clone, Copy)]
pub struct DownscaleOptions {
    pub max_width: u32,
    pub jpeg_quality: u8,
    /// Ceiling for the re-encoded output, in bytes.
    pub max_output_bytes: usize,
}

/// Downscale and re-encode a JPEG payload. CPU-bound; callers run this under
/// `spawn_blocking`.
pub fn downscale_jpeg(data: &[u8], options: &DownscaleOptions) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| AppError::ImageProcessing(format!("Failed to decode JPEG: {}", e)))?;

    let img = if img.width() > options.max_width {
        img.resize(options.max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, options.jpeg_quality);
    img.write_with_encoder(encoder)
        .map_err(|e| AppError::ImageProcessing(format!("Failed to re-encode JPEG: {}", e)))?;

    let output = output.into_inner();
    if output.len() > options.max_output_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Re-encoded image still exceeds {} bytes",
            options.max_output_bytes
        )));
    }

    Ok(output)
}
