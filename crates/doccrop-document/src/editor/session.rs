// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit session — everything the editor knows about the current image: the
// source and display rasters, the default and current selection, and which
// corner (if any) is being dragged.

use doccrop_core::error::Result;
use doccrop_core::{
    DisplayScale, EditorConfig, ExportConfig, Handle, PixelRect, Point, PointerPhase,
    PointerSample, Selection, Size, Viewport,
};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument, trace, warn};

use crate::editor::export::{CroppedImage, export_selection};
use crate::editor::render::render_frame;
use crate::scan::detect::{BoundaryDetector, Detection};

/// Interactive editing state for one processed image.
///
/// The session is the only owner of its state and is mutated through
/// `&mut self`; a new image means a new session.
///
/// Pointer input drives a two-state machine:
///
/// - idle (`active_handle() == None`): a `Down` within the hit tolerance of a
///   corner starts dragging that corner
/// - dragging: `Move` overwrites the dragged corner; `Up` or `Cancel` returns
///   to idle
pub struct EditSession {
    source: DynamicImage,
    display: RgbaImage,
    scale: DisplayScale,
    bounds: PixelRect,
    defaults: Selection,
    selection: Selection,
    active: Option<Handle>,
    config: EditorConfig,
    frame: RgbaImage,
}

impl EditSession {
    /// Start a session from a finished detection of `source`.
    #[instrument(skip_all, fields(width = source.width(), height = source.height()))]
    pub fn new(source: DynamicImage, detection: Detection, config: EditorConfig) -> Self {
        let Detection {
            bounds,
            display,
            scale,
            selection,
        } = detection;
        let frame = render_frame(&display, &selection, &config);
        info!(
            interactive = config.interactive,
            start = ?selection.start,
            end = ?selection.end,
            "Edit session started"
        );
        Self {
            source,
            display,
            scale,
            bounds,
            defaults: selection,
            selection,
            active: None,
            config,
            frame,
        }
    }

    /// Detect the boundary of `source` and start a session on it.
    pub fn open(source: DynamicImage, detector: &BoundaryDetector, config: EditorConfig) -> Self {
        let detection = detector.detect(&source);
        Self::new(source, detection, config)
    }

    // -- Accessors ------------------------------------------------------------

    /// Current selection in display space.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selection computed by the detector, restored by `reset`.
    pub fn defaults(&self) -> Selection {
        self.defaults
    }

    /// Detected boundary in image space.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_interactive(&self) -> bool {
        self.config.interactive
    }

    pub fn source(&self) -> &DynamicImage {
        &self.source
    }

    pub fn source_size(&self) -> Size {
        Size::new(self.source.width(), self.source.height())
    }

    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn display_size(&self) -> Size {
        Size::new(self.display.width(), self.display.height())
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    // -- Interaction ----------------------------------------------------------

    /// Corner under `point` (display space), if any.
    ///
    /// A corner is hit when the point lies strictly within the tolerance on
    /// both axes. `Start` is checked first, so it wins when the two corners
    /// overlap; nothing else depends on that ordering.
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let tolerance = self.config.handle_tolerance;
        [Handle::Start, Handle::End].into_iter().find(|&handle| {
            let corner = self.selection.corner(handle);
            (point.x - corner.x).abs() < tolerance && (point.y - corner.y).abs() < tolerance
        })
    }

    /// Feed one pointer sample, given where the display surface currently sits
    /// on screen. Returns `true` when the selection changed and a new frame
    /// was rendered.
    pub fn handle_pointer(&mut self, sample: PointerSample, viewport: Viewport) -> bool {
        if !self.config.interactive {
            trace!(?sample, "Pointer ignored: session is display-only");
            return false;
        }

        match sample.phase {
            PointerPhase::Up | PointerPhase::Cancel => {
                if let Some(handle) = self.active.take() {
                    debug!(?handle, phase = ?sample.phase, "Drag finished");
                }
                false
            }
            PointerPhase::Down | PointerPhase::Move => {
                let Some(point) = viewport.to_canvas(sample.client, self.display_size()) else {
                    warn!(?viewport, "Pointer ignored: display surface has no size");
                    return false;
                };
                if sample.phase == PointerPhase::Down {
                    self.active = self.hit_test(point);
                    if let Some(handle) = self.active {
                        debug!(?handle, x = point.x, y = point.y, "Drag started");
                    }
                    return false;
                }
                match self.active {
                    Some(handle) => {
                        self.selection.set_corner(handle, point);
                        trace!(?handle, x = point.x, y = point.y, "Corner moved");
                        self.render();
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Move `handle` straight to `point` (display space) without a pointer
    /// press, for shells that address corners by name. Ignored in display-only
    /// sessions. Returns `true` when the frame was redrawn.
    pub fn place_corner(&mut self, handle: Handle, point: Point) -> bool {
        if !self.config.interactive {
            trace!(?handle, "Placement ignored: session is display-only");
            return false;
        }
        self.selection.set_corner(handle, point);
        debug!(?handle, x = point.x, y = point.y, "Corner placed");
        self.render();
        true
    }

    /// Restore the detector's selection and redraw. Any drag in progress stays
    /// in progress.
    pub fn reset(&mut self) {
        self.selection = self.defaults;
        debug!(start = ?self.selection.start, end = ?self.selection.end, "Selection reset");
        self.render();
    }

    /// Redraw the frame from the display image and the current selection.
    pub fn render(&mut self) -> &RgbaImage {
        self.frame = render_frame(&self.display, &self.selection, &self.config);
        &self.frame
    }

    /// Crop the current selection and encode it for download.
    pub fn export(&self, config: &ExportConfig) -> Result<CroppedImage> {
        export_selection(
            &self.source,
            &self.display,
            &self.selection,
            self.scale,
            config,
        )
    }
}
