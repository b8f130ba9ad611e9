//! Image encoder abstraction
//!
//! One encoder per output format behind a common trait. The quality
//! parameter applies to the lossy formats; PNG is lossless and uses the
//! strongest compression regardless of the requested value.
//!
//! Note: the `image` crate only supports lossless WebP encoding, so lossy
//! WebP goes through the `webp` crate directly.

use super::params::OutputFormat;
use crate::constants::AVIF_SPEED;
use crate::error::OptimizeError;

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// The output format
    pub format: OutputFormat,
    /// Content-Type header value
    pub content_type: &'static str,
}

impl EncodedImage {
    pub fn new(data: Vec<u8>, format: OutputFormat) -> Self {
        let content_type = format.content_type();
        Self {
            data,
            format,
            content_type,
        }
    }
}

/// Trait for image encoders
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode raw RGBA image data (4 bytes per pixel) to the target format
    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<EncodedImage, OptimizeError>;
}

/// Lossy WebP encoder via the `webp` crate
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<EncodedImage, OptimizeError> {
        let encoder = webp::Encoder::from_rgba(data, width, height);
        let encoded = encoder.encode(f32::from(quality));

        Ok(EncodedImage::new(encoded.to_vec(), OutputFormat::WebP))
    }
}

/// AVIF encoder using the image crate (ravif-backed)
pub struct AvifEncoder {
    /// Speed preset (1-10, where 1 is slowest/best quality)
    pub speed: u8,
}

impl Default for AvifEncoder {
    fn default() -> Self {
        Self { speed: AVIF_SPEED }
    }
}

impl ImageEncoder for AvifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Avif
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<EncodedImage, OptimizeError> {
        use image::codecs::avif::AvifEncoder as ImageAvifEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageAvifEncoder::new_with_speed_quality(&mut output, self.speed, quality);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| OptimizeError::encode_failed("avif", e.to_string()))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Avif))
    }
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<EncodedImage, OptimizeError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        // JPEG doesn't support alpha
        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality);

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| OptimizeError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Jpeg))
    }
}

/// PNG encoder using the image crate
///
/// PNG is lossless; the quality number has no meaning here beyond
/// compression effort, so the encoder always uses the best compression.
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: u8,
    ) -> Result<EncodedImage, OptimizeError> {
        use image::codecs::png::{CompressionType, FilterType, PngEncoder as ImagePngEncoder};
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new_with_quality(
            &mut output,
            CompressionType::Best,
            FilterType::Adaptive,
        );

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| OptimizeError::encode_failed("png", e.to_string()))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Png))
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::WebP => Box::new(WebPEncoder),
            OutputFormat::Avif => Box::new(AvifEncoder::default()),
            OutputFormat::Jpeg => Box::new(JpegEncoder),
            OutputFormat::Png => Box::new(PngEncoder),
        }
    }
}

/// Convert RGBA to RGB by discarding the alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    for chunk in rgba.chunks_exact(4) {
        rgb.push(chunk[0]);
        rgb.push(chunk[1]);
        rgb.push(chunk[2]);
    }

    rgb
}
