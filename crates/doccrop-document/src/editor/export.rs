// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop export — turn the display-space selection into a JPEG of the chosen
// region.

use doccrop_core::error::{DocCropError, Result};
use doccrop_core::{DisplayScale, ExportConfig, ExportMode, PixelRect, Selection, Size};
use image::{DynamicImage, RgbaImage};
use tracing::{info, instrument, warn};

use crate::image::processor::ImageProcessor;

/// An encoded crop ready to be offered for download.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    /// JPEG data.
    pub bytes: Vec<u8>,
}

/// Region of a `bounds`-sized raster covered by `selection`, after mapping it
/// through `scale` (display pixels per raster pixel).
///
/// Width and height are the absolute corner differences; the origin is the
/// top-left-most corner. The region is clamped to the raster. An empty
/// selection, before or after clamping, is an error.
pub fn crop_region(selection: &Selection, scale: DisplayScale, bounds: Size) -> Result<PixelRect> {
    if selection.is_empty() {
        return Err(DocCropError::EmptySelection {
            width: selection.width().round() as u32,
            height: selection.height().round() as u32,
        });
    }

    // Origin and extent round separately: size is the rounded corner delta.
    let (x, y) = scale.to_image(selection.origin());
    let (x, y) = (x.round(), y.round());
    let width = (selection.width() as f64 / scale.x).round();
    let height = (selection.height() as f64 / scale.y).round();

    let clamp = |value: f64, max: u32| value.clamp(0.0, max as f64) as u32;
    let left = clamp(x, bounds.width);
    let top = clamp(y, bounds.height);
    let right = clamp(x + width, bounds.width);
    let bottom = clamp(y + height, bounds.height);

    let region = PixelRect::new(left, top, right - left, bottom - top);
    if region.is_degenerate() {
        return Err(DocCropError::EmptySelection {
            width: region.width,
            height: region.height,
        });
    }
    Ok(region)
}

/// Crop and encode the selection.
///
/// In `SourceResolution` mode the selection is mapped back to image space and
/// the pixels come from the full-resolution `source`; in `Display` mode they
/// come straight from the `display` copy.
#[instrument(skip(source, display, config), fields(mode = ?config.mode))]
pub fn export_selection(
    source: &DynamicImage,
    display: &RgbaImage,
    selection: &Selection,
    scale: DisplayScale,
    config: &ExportConfig,
) -> Result<CroppedImage> {
    let (raster, scale) = match config.mode {
        ExportMode::SourceResolution => (None, scale),
        ExportMode::Display => (
            Some(DynamicImage::ImageRgba8(display.clone())),
            DisplayScale { x: 1.0, y: 1.0 },
        ),
    };
    let raster = raster.as_ref().unwrap_or(source);

    let region = crop_region(selection, scale, Size::new(raster.width(), raster.height()))
        .inspect_err(|err| warn!(%err, "Export refused"))?;

    let cropped = ImageProcessor::crop_from(raster, region);
    let bytes = cropped.to_jpeg_bytes(config.jpeg_quality)?;

    info!(
        x = region.x,
        y = region.y,
        width = cropped.width(),
        height = cropped.height(),
        bytes = bytes.len(),
        "Selection exported"
    );

    Ok(CroppedImage {
        file_name: config.file_name.clone(),
        width: cropped.width(),
        height: cropped.height(),
        bytes,
    })
}
