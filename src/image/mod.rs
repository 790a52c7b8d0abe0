use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, RgbImage};
use serde::Serialize;

use crate::error::{Result, VispioError};

/// Smallest accepted edge length in pixels.
pub const MIN_DIMENSION: u32 = 10;

/// Largest accepted pixel count (100 MP).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Display bound applied before preview rendering.
pub const DISPLAY_MAX_SIZE: (u32, u32) = (1024, 1024);

/// Upload budget for the Gemini inline image part.
pub const TRANSFER_MAX_BYTES: usize = 4 * 1024 * 1024;

const QUALITY_START: u8 = 95;
const QUALITY_FLOOR: u8 = 20;
const QUALITY_STEP: u8 = 10;
const FALLBACK_MAX_SIZE: (u32, u32) = (800, 600);
const FALLBACK_QUALITY: u8 = 80;

/// Metadata snapshot of a decoded image.
#[derive(Clone, Debug, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub total_pixels: u64,
    pub aspect_ratio: f64,
    pub estimated_jpeg_bytes: usize,
    pub has_transparency: bool,
}

/// Upload preparation: validation, display resizing, and re-encoding to fit
/// the transfer budget.
pub struct ImagePipeline;

impl ImagePipeline {
    /// Decode uploaded bytes. A decode failure is an input validation error,
    /// rejected before any external call.
    pub fn load(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| VispioError::ImageDecode(e.to_string()))
    }

    /// Check whether an image can be processed at all.
    ///
    /// Rejects images with either dimension below [`MIN_DIMENSION`], a pixel
    /// count above [`MAX_PIXELS`], or an unsupported color type.
    pub fn validate(img: &DynamicImage) -> bool {
        let (width, height) = img.dimensions();

        if !Self::within_pixel_limits(width, height) {
            return false;
        }

        let supported = matches!(
            img.color(),
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
        );
        if !supported {
            tracing::warn!(color = ?img.color(), "unsupported color type");
        }

        supported
    }

    /// `validate` as a hard error, for callers that cannot proceed on a bad
    /// upload.
    pub fn ensure_valid(img: &DynamicImage) -> Result<()> {
        if Self::validate(img) {
            Ok(())
        } else {
            Err(VispioError::InvalidImage(
                "dimensions or color type out of bounds".to_string(),
            ))
        }
    }

    /// Dimension bounds alone, without decoding pixel data.
    pub fn within_pixel_limits(width: u32, height: u32) -> bool {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            tracing::warn!(width, height, "image too small");
            return false;
        }

        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            tracing::warn!(width, height, "image too large");
            return false;
        }

        true
    }

    /// Downscale to fit within `max_size`, preserving aspect ratio.
    ///
    /// Transparency is flattened onto a white background first. Images already
    /// within bounds are returned at their original dimensions.
    pub fn resize_for_display(img: &DynamicImage, max_size: (u32, u32)) -> DynamicImage {
        let rgb = Self::flatten_to_rgb(img);
        let (width, height) = rgb.dimensions();
        let (max_width, max_height) = max_size;

        let width_ratio = f64::from(max_width) / f64::from(width);
        let height_ratio = f64::from(max_height) / f64::from(height);
        let scale = width_ratio.min(height_ratio).min(1.0);

        if scale >= 1.0 {
            return DynamicImage::ImageRgb8(rgb);
        }

        let new_width = ((f64::from(width) * scale) as u32).max(1);
        let new_height = ((f64::from(height) * scale) as u32).max(1);

        let resized = DynamicImage::ImageRgb8(rgb).resize_exact(
            new_width,
            new_height,
            FilterType::Lanczos3,
        );
        tracing::info!(
            from = %format!("{}x{}", width, height),
            to = %format!("{}x{}", new_width, new_height),
            "image resized for display"
        );
        resized
    }

    /// Re-encode as JPEG to fit `max_bytes`.
    ///
    /// Walks the quality ladder from 95 down to 20 in steps of 10 and returns
    /// the first encoding that fits. When the floor is reached without meeting
    /// the budget, shrinks to fit 800x600 and encodes at quality 80. The
    /// fallback always returns bytes; its size is not re-checked against the
    /// budget.
    pub fn optimize_for_transfer(img: &DynamicImage, max_bytes: usize) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgb8(Self::flatten_to_rgb(img));

        let mut quality = QUALITY_START;
        while quality >= QUALITY_FLOOR {
            let bytes = Self::encode_jpeg(&rgb, quality)?;
            if bytes.len() <= max_bytes {
                tracing::info!(size = bytes.len(), quality, "image optimized for transfer");
                return Ok(bytes);
            }
            quality -= QUALITY_STEP;
        }

        let shrunk = Self::resize_for_display(&rgb, FALLBACK_MAX_SIZE);
        let bytes = Self::encode_jpeg(&shrunk, FALLBACK_QUALITY)?;
        tracing::info!(size = bytes.len(), "image shrunk to fallback bounds for transfer");
        Ok(bytes)
    }

    /// Encode as JPEG at a fixed quality.
    pub fn to_jpeg_bytes(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgb8(Self::flatten_to_rgb(img));
        Self::encode_jpeg(&rgb, quality)
    }

    /// Small preview image, bounded by `size`.
    pub fn thumbnail(img: &DynamicImage, size: (u32, u32)) -> DynamicImage {
        img.thumbnail(size.0, size.1)
    }

    pub fn info(img: &DynamicImage) -> ImageInfo {
        let (width, height) = img.dimensions();
        let estimated_jpeg_bytes = Self::to_jpeg_bytes(img, 85)
            .map(|b| b.len())
            .unwrap_or(0);

        ImageInfo {
            width,
            height,
            color: format!("{:?}", img.color()),
            total_pixels: u64::from(width) * u64::from(height),
            aspect_ratio: if height > 0 {
                f64::from(width) / f64::from(height)
            } else {
                0.0
            },
            estimated_jpeg_bytes,
            has_transparency: img.color().has_alpha(),
        }
    }

    /// Blend alpha channels over white so JPEG encoding never sees
    /// transparency.
    fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
        if !img.color().has_alpha() {
            return img.to_rgb8();
        }

        let rgba = img.to_rgba8();
        let mut flat = RgbImage::new(rgba.width(), rgba.height());
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let alpha = f32::from(pixel[3]) / 255.0;
            let blend = |c: u8| ((f32::from(c) * alpha) + (255.0 * (1.0 - alpha))) as u8;
            flat.put_pixel(x, y, image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
        }
        flat
    }

    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        img.write_with_encoder(encoder)
            .map_err(|e| VispioError::Other(anyhow::anyhow!("JPEG encode failed: {e}")))?;
        Ok(buffer.into_inner())
    }
}
