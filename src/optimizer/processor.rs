//! Image processing implementation
//!
//! Handles the actual image transformation: decode → fit-inside resize →
//! encode. When neither dimension is requested the resize step is skipped
//! entirely and only format/quality conversion applies.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::EncoderFactory;
use super::params::TransformRequest;
use crate::error::OptimizeError;

/// Result of a transformation
pub struct TransformedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// Content-Type header value for the output format
    pub content_type: &'static str,
    /// Original dimensions (width, height)
    pub original_size: (u32, u32),
    /// Output dimensions (width, height)
    pub output_size: (u32, u32),
}

/// Transforms original image bytes according to the request
pub fn transform(
    data: &[u8],
    request: &TransformRequest,
) -> Result<TransformedImage, OptimizeError> {
    let img = decode_image(data)?;
    let src_width = img.width();
    let src_height = img.height();

    let (target_width, target_height) = if request.wants_resize() {
        fit_inside(src_width, src_height, request.width, request.height)
    } else {
        (src_width, src_height)
    };

    let processed = if (target_width, target_height) != (src_width, src_height) {
        resize_image(&img, target_width, target_height)?
    } else {
        img
    };

    let rgba_data = processed.to_rgba8().into_raw();
    let encoder = EncoderFactory::create(request.format);
    let encoded = encoder.encode(&rgba_data, target_width, target_height, request.quality)?;

    Ok(TransformedImage {
        data: encoded.data,
        content_type: encoded.content_type,
        original_size: (src_width, src_height),
        output_size: (target_width, target_height),
    })
}

/// Decode image data into a DynamicImage
fn decode_image(data: &[u8]) -> Result<DynamicImage, OptimizeError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| OptimizeError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| OptimizeError::decode_failed(e.to_string()))
}

/// Computes the largest size that fits within the requested box without
/// exceeding the original dimensions, preserving aspect ratio
///
/// An absent side leaves that axis unbounded; both absent means no resize.
/// The scale factor is capped at 1.0, so the output never enlarges.
fn fit_inside(
    src_width: u32,
    src_height: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    if width.is_none() && height.is_none() {
        return (src_width, src_height);
    }

    let scale_w = width.map_or(f64::INFINITY, |w| f64::from(w) / f64::from(src_width));
    let scale_h = height.map_or(f64::INFINITY, |h| f64::from(h) / f64::from(src_height));
    let scale = scale_w.min(scale_h).min(1.0);

    let out_width = ((f64::from(src_width) * scale).round() as u32).max(1);
    let out_height = ((f64::from(src_height) * scale).round() as u32).max(1);
    (out_width, out_height)
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn resize_image(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, OptimizeError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| OptimizeError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| OptimizeError::resize_failed("Source height is 0"))?;
    let dst_width = NonZeroU32::new(target_w)
        .ok_or_else(|| OptimizeError::resize_failed("Target width is 0"))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| OptimizeError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| OptimizeError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| OptimizeError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let result_buf = dst_image.into_vec();
    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, result_buf)
        .ok_or_else(|| OptimizeError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::params::OutputFormat;

    fn create_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });

        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn request(path: &str) -> TransformRequest {
        TransformRequest::from_path(path).unwrap()
    }

    #[test]
    fn test_decode_invalid_data() {
        let result = decode_image(&[0, 1, 2, 3, 4, 5]);
        assert!(matches!(result, Err(OptimizeError::DecodeFailed { .. })));
    }

    #[test]
    fn test_fit_inside_no_dimensions() {
        assert_eq!(fit_inside(100, 50, None, None), (100, 50));
    }

    #[test]
    fn test_fit_inside_both_bounds() {
        // 100x50 into 40x40: width binds, aspect preserved
        assert_eq!(fit_inside(100, 50, Some(40), Some(40)), (40, 20));
        // 50x100 into 40x40: height binds
        assert_eq!(fit_inside(50, 100, Some(40), Some(40)), (20, 40));
    }

    #[test]
    fn test_fit_inside_single_bound() {
        assert_eq!(fit_inside(100, 50, Some(50), None), (50, 25));
        assert_eq!(fit_inside(100, 50, None, Some(25)), (50, 25));
    }

    #[test]
    fn test_fit_inside_never_enlarges() {
        assert_eq!(fit_inside(400, 400, Some(800), None), (400, 400));
        assert_eq!(fit_inside(400, 400, Some(800), Some(600)), (400, 400));
        assert_eq!(fit_inside(100, 50, Some(200), Some(200)), (100, 50));
    }

    #[test]
    fn test_fit_inside_minimum_one_pixel() {
        assert_eq!(fit_inside(1000, 2, Some(10), None), (10, 1));
    }

    #[test]
    fn test_transform_passthrough_converts_format_only() {
        let png = create_test_png(8, 8);
        let result = transform(&png, &request("/x/80/jpeg/img.png")).unwrap();
        assert_eq!(result.output_size, (8, 8));
        assert_eq!(result.original_size, (8, 8));
        assert_eq!(result.content_type, "image/jpeg");
        assert_eq!(&result.data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_transform_resizes_within_box() {
        let png = create_test_png(64, 32);
        let result = transform(&png, &request("/32x32/80/png/img.png")).unwrap();
        assert_eq!(result.output_size, (32, 16));
    }

    #[test]
    fn test_transform_never_upscales() {
        let png = create_test_png(16, 16);
        let result = transform(&png, &request("/800x600/80/webp/img.png")).unwrap();
        assert_eq!(result.output_size, (16, 16));
        assert_eq!(result.content_type, "image/webp");
    }

    #[test]
    fn test_transform_rejects_garbage() {
        let result = transform(b"not an image", &request("/x/80/webp/img.png"));
        assert!(result.is_err());
    }
}
