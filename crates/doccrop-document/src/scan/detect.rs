// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary detection — find the axis-aligned rectangle enclosing the document
// in a photo, and prepare the downscaled copy the editor displays.

use doccrop_core::{DetectorConfig, DisplayScale, PixelRect, Selection, Size};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument, warn};

use crate::image::edges::canny_l1;
use crate::image::filters::{
    bounding_rect_nonzero, box_blur, dilate_rect, erode_rect, threshold_binary,
};
use crate::image::processor::ImageProcessor;

/// Result of running the detector on one image.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Detected document boundary in image space. May be degenerate.
    pub bounds: PixelRect,
    /// Colour copy of the image resized for display.
    pub display: RgbaImage,
    /// Display pixels per image pixel on each axis.
    pub scale: DisplayScale,
    /// `bounds` mapped into display space.
    pub selection: Selection,
}

impl Detection {
    /// Size of the original image the detection was run on.
    pub fn source_size(&self) -> Size {
        Size::new(
            (self.display.width() as f64 / self.scale.x).round() as u32,
            (self.display.height() as f64 / self.scale.y).round() as u32,
        )
    }

    pub fn display_size(&self) -> Size {
        Size::new(self.display.width(), self.display.height())
    }
}

/// Stateless document boundary detector.
///
/// ## Pipeline
///
/// 1. Grayscale conversion
/// 2. 5x5 box blur to suppress sensor noise
/// 3. Canny edges (3x3 Sobel, L1 magnitude, no further smoothing) with
///    deliberately low thresholds (40/45) so faint page borders survive
///    uneven lighting; texture noise comes along with them
/// 4. Five rounds of 10x10 dilation followed by 11x11 erosion, fusing the
///    edge fragments around the page into one blob while isolated noise
///    disappears
/// 5. 60x60 box blur turning the blob into a soft mass
/// 6. Binary threshold at 200
/// 7. Bounding rectangle of the remaining pixels
///
/// The display copy is then produced by an area-averaging resize to 640 wide
/// (landscape) or 480 tall (portrait and square).
#[derive(Debug, Clone, Default)]
pub struct BoundaryDetector {
    config: DetectorConfig,
}

impl BoundaryDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline: locate the boundary, build the display copy
    /// and map the boundary into display space.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Detection {
        let bounds = self.locate(image);

        let source = Size::new(image.width(), image.height());
        let target = display_size(source, &self.config);
        let display = ImageProcessor::from_dynamic(image.clone())
            .resize_area(target.width, target.height)
            .into_dynamic()
            .to_rgba8();

        let scale = DisplayScale::between(source, target);
        let selection = scale.map_rect(&bounds);

        info!(
            ?bounds,
            display_w = target.width,
            display_h = target.height,
            start = ?selection.start,
            end = ?selection.end,
            "Document boundary detected"
        );

        Detection {
            bounds,
            display,
            scale,
            selection,
        }
    }

    /// Steps 1-7: the boundary rectangle in image space.
    ///
    /// Each stage shadows the previous working buffer, so at most two
    /// single-channel buffers are alive at once.
    #[instrument(skip_all)]
    pub fn locate(&self, image: &DynamicImage) -> PixelRect {
        let c = &self.config;

        let work = image.to_luma8();
        debug!("Converted to grayscale");

        let work = box_blur(&work, c.smoothing_kernel);
        debug!(kernel = c.smoothing_kernel, "Applied smoothing blur");

        let mut work = canny_l1(&work, c.canny_low, c.canny_high);
        debug!(low = c.canny_low, high = c.canny_high, "Canny edge detection complete");

        for round in 0..c.closing_iterations {
            work = dilate_rect(&work, c.dilate_kernel);
            work = erode_rect(&work, c.erode_kernel);
            debug!(round, "Closing round complete");
        }

        let work = box_blur(&work, c.consolidation_kernel);
        debug!(kernel = c.consolidation_kernel, "Applied consolidation blur");

        let work = threshold_binary(&work, c.threshold, c.threshold_max);
        let bounds = bounding_rect_nonzero(&work);

        if bounds.is_degenerate() {
            warn!(?bounds, "No document region found; selection will be empty");
        }
        bounds
    }
}

/// Display dimensions for an image: 640 wide for landscape, 480 tall
/// otherwise, preserving aspect ratio with the other side rounded.
pub fn display_size(image: Size, config: &DetectorConfig) -> Size {
    let aspect = image.aspect_ratio();
    if image.width > image.height {
        let width = config.display_landscape_width;
        let height = (width as f64 / aspect).round().max(1.0) as u32;
        Size::new(width, height)
    } else {
        let height = config.display_portrait_height;
        let width = (height as f64 * aspect).round().max(1.0) as u32;
        Size::new(width, height)
    }
}
