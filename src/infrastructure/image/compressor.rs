//! Payment screenshot compression: decode, downscale, re-encode as WebP

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use webp::{Encoder, WebPConfig};

use crate::domain::DomainError;

/// Longest allowed edge of a stored screenshot
pub const MAX_DIMENSION: u32 = 1200;
/// Lossy WebP quality
pub const WEBP_QUALITY: f32 = 80.0;
/// libwebp effort level (0 fastest, 6 smallest output)
pub const WEBP_METHOD: i32 = 6;

/// A re-encoded image ready for upload
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `raw`, fit it within `MAX_DIMENSION` and encode it as lossy WebP
///
/// CPU bound; call from a blocking thread.
pub fn compress_to_webp(raw: &[u8]) -> Result<CompressedImage, DomainError> {
    let decoded = image::load_from_memory(raw)
        .map_err(|_| DomainError::validation("Uploaded file is not a valid image"))?;

    let resized = fit_within(decoded, MAX_DIMENSION);
    let (width, height) = resized.dimensions();

    // libwebp only takes 8-bit RGB or RGBA buffers
    let normalized = if resized.color().has_alpha() {
        DynamicImage::ImageRgba8(resized.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    };

    let encoder = Encoder::from_image(&normalized)
        .map_err(|e| DomainError::dependency("webp", format!("Unsupported image layout: {}", e)))?;

    let mut config = WebPConfig::new()
        .map_err(|_| DomainError::dependency("webp", "Failed to initialise encoder config"))?;
    config.lossless = 0;
    config.quality = WEBP_QUALITY;
    config.method = WEBP_METHOD;

    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| DomainError::dependency("webp", format!("Encoding failed: {:?}", e)))?;

    Ok(CompressedImage {
        bytes: encoded.to_vec(),
        width,
        height,
    })
}

/// Downscale to fit a `max` x `max` box, keeping aspect ratio; never enlarges
fn fit_within(image: DynamicImage, max: u32) -> DynamicImage {
    let (width, height) = image.dimensions();

    if width <= max && height <= max {
        return image;
    }

    image.resize(max, max, FilterType::Lanczos3)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a gradient of the given size as PNG
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_large_image_is_downscaled_preserving_ratio() {
        let compressed = compress_to_webp(&png_bytes(2400, 1200)).unwrap();

        assert_eq!(compressed.width, 1200);
        assert_eq!(compressed.height, 600);
        assert_eq!(&compressed.bytes[0..4], b"RIFF");
        assert_eq!(&compressed.bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_tall_image_fits_height() {
        let compressed = compress_to_webp(&png_bytes(300, 1500)).unwrap();

        assert_eq!(compressed.height, 1200);
        assert_eq!(compressed.width, 240);
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let compressed = compress_to_webp(&png_bytes(320, 200)).unwrap();

        assert_eq!((compressed.width, compressed.height), (320, 200));
    }

    #[test]
    fn test_alpha_channel_is_accepted() {
        let image = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 128]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();

        let compressed = compress_to_webp(buffer.get_ref()).unwrap();
        assert_eq!((compressed.width, compressed.height), (64, 64));
    }

    #[test]
    fn test_garbage_is_rejected_as_validation_error() {
        let result = compress_to_webp(b"definitely not an image");

        match result {
            Err(DomainError::Validation { message }) => {
                assert_eq!(message, "Uploaded file is not a valid image")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
