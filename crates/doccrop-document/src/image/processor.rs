// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, area-averaging resize, crop and encode. Operates
// on in-memory images using the `image` crate.

use doccrop_core::PixelRect;
use doccrop_core::error::{DocCropError, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info, instrument};

/// Image processing wrapper around a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::open("page.jpg")?
///     .resize_area(640, 427)
///     .to_jpeg_bytes(92)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let processor = Self::from_bytes(&bytes)?;
        info!(
            width = processor.width(),
            height = processor.height(),
            "Image loaded"
        );
        Ok(processor)
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            DocCropError::UnsupportedImage(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Copy a rectangular region out of `image`.
    ///
    /// Values are clamped to the image bounds, so the result may be smaller
    /// than requested.
    #[instrument(skip(image), fields(x = rect.x, y = rect.y, width = rect.width, height = rect.height))]
    pub fn crop_from(image: &DynamicImage, rect: PixelRect) -> Self {
        let img_w = image.width();
        let img_h = image.height();

        let safe_x = rect.x.min(img_w.saturating_sub(1));
        let safe_y = rect.y.min(img_h.saturating_sub(1));
        let safe_w = rect.width.min(img_w - safe_x);
        let safe_h = rect.height.min(img_h - safe_y);

        debug!(safe_x, safe_y, safe_w, safe_h, "Cropping image");

        Self {
            image: image.crop_imm(safe_x, safe_y, safe_w, safe_h),
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Resize to exactly `width` x `height` by area averaging.
    ///
    /// Every destination pixel is the coverage-weighted mean of the source
    /// pixels under its footprint, which keeps thin edges visible when a
    /// large photo is shrunk for display. The result is always RGBA.
    #[instrument(skip(self), fields(width, height))]
    pub fn resize_area(self, width: u32, height: u32) -> Self {
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Area resize"
        );
        let rgba = self.image.to_rgba8();
        Self {
            image: DynamicImage::ImageRgba8(resize_area_rgba(&rgba, width, height)),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            DocCropError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            DocCropError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Per destination index, the source indices it covers and their weights.
/// Weights of one destination index sum to 1.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let mut taps = Vec::new();
            let mut s = start.floor() as u32;
            while (s as f64) < end && s < src_len {
                let covered = end.min(s as f64 + 1.0) - start.max(s as f64);
                if covered > 1e-9 {
                    taps.push((s as usize, (covered / scale) as f32));
                }
                s += 1;
            }
            taps
        })
        .collect()
}

fn resize_area_rgba(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = src.dimensions();
    if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
        return RgbaImage::new(width, height);
    }

    let x_taps = area_taps(src_w, width);
    let y_taps = area_taps(src_h, height);

    // Horizontal pass: src_h rows of `width` accumulated pixels.
    let w = width as usize;
    let mut rows = vec![[0f32; 4]; w * src_h as usize];
    for y in 0..src_h {
        for (dx, taps) in x_taps.iter().enumerate() {
            let mut acc = [0f32; 4];
            for &(sx, weight) in taps {
                let px = src.get_pixel(sx as u32, y).0;
                for c in 0..4 {
                    acc[c] += px[c] as f32 * weight;
                }
            }
            rows[y as usize * w + dx] = acc;
        }
    }

    // Vertical pass.
    RgbaImage::from_fn(width, height, |dx, dy| {
        let mut acc = [0f32; 4];
        for &(sy, weight) in &y_taps[dy as usize] {
            let px = rows[sy * w + dx as usize];
            for c in 0..4 {
                acc[c] += px[c] * weight;
            }
        }
        Rgba(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| DocCropError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
