//! Codec adapter between the converter and the image libraries.
//!
//! Decoding goes through the `image` crate, encoding through libwebp via the
//! `webp` crate because `image` only ships a lossless WebP encoder.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Effort used by libwebp in lossless mode (its own default).
const LOSSLESS_EFFORT: f32 = 75.0;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("WebP encoder error: {0}")]
    Webp(String),
}

/// How the target file is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Exact pixels, used to protect transparent edges
    Lossless,
    /// Quality 0-100, 100 being the best and largest
    Lossy { quality: u8 },
}

impl EncodeMode {
    pub fn is_lossless(&self) -> bool {
        matches!(self, EncodeMode::Lossless)
    }
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeMode::Lossless => write!(f, "lossless"),
            EncodeMode::Lossy { quality } => write!(f, "lossy q{}", quality),
        }
    }
}

/// A decoded source image and the container format it was read from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
}

impl DecodedImage {
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

/// Decode/encode seam used by the converter.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;

    fn encode(&self, image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>, CodecError>;
}

/// Production codec: `image` for decoding, libwebp for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        // Content sniffing first so a mislabelled file still decodes.
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let image = reader.decode()?;
        Ok(DecodedImage { image, format })
    }

    fn encode(&self, image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>, CodecError> {
        let (width, height) = image.dimensions();
        let (lossless, quality) = match mode {
            EncodeMode::Lossless => (true, LOSSLESS_EFFORT),
            EncodeMode::Lossy { quality } => (false, f32::from(quality)),
        };

        let memory = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(lossless, quality)
                .map_err(|e| CodecError::Webp(format!("{:?}", e)))?
                .to_vec()
        } else {
            let rgb = image.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_simple(lossless, quality)
                .map_err(|e| CodecError::Webp(format!("{:?}", e)))?
                .to_vec()
        };

        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn opaque_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, 128])
        }))
    }

    fn transparent_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(32, 32, |x, y| {
            Rgba([255, (x * 8) as u8, (y * 8) as u8, if x < 16 { 96 } else { 255 }])
        }))
    }

    #[test]
    fn test_encode_mode_display() {
        assert_eq!(EncodeMode::Lossless.to_string(), "lossless");
        assert_eq!(EncodeMode::Lossy { quality: 80 }.to_string(), "lossy q80");
    }

    #[test]
    fn test_encode_produces_riff_webp() {
        let bytes = WebpCodec
            .encode(&opaque_image(), EncodeMode::Lossy { quality: 80 })
            .unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_lossless_encode_is_deterministic() {
        let img = transparent_image();
        let first = WebpCodec.encode(&img, EncodeMode::Lossless).unwrap();
        let second = WebpCodec.encode(&img, EncodeMode::Lossless).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lossless_round_trip_preserves_pixels() {
        let img = transparent_image();
        let bytes = WebpCodec.encode(&img, EncodeMode::Lossless).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_decode_detects_format_and_alpha() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("alpha.png");
        transparent_image().save(&path).unwrap();

        let decoded = WebpCodec.decode(&path).unwrap();
        assert_eq!(decoded.format, Some(ImageFormat::Png));
        assert!(decoded.has_alpha());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.jpg");
        std::fs::write(&path, b"fake image data").unwrap();

        assert!(WebpCodec.decode(&path).is_err());
    }
}
