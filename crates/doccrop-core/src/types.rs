// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: geometry in image and display space, the display scale
// that converts between the two, and device-neutral pointer samples.

use serde::{Deserialize, Serialize};

/// A point in display (canvas) pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`. Zero-height sizes report an aspect ratio of 1.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Axis-aligned rectangle in image (source) pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// A rectangle with no area. Detection can legitimately produce one.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The two draggable corners of the crop rectangle, in display space.
///
/// `start` is the top-left corner and `end` the bottom-right ("final") corner
/// as produced by detection. Dragging may swap their order, so extents are
/// always taken as absolute differences.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f32 {
        (self.end.x - self.start.x).abs()
    }

    pub fn height(&self) -> f32 {
        (self.end.y - self.start.y).abs()
    }

    /// Top-left-most coordinates of the two corners.
    pub fn origin(&self) -> Point {
        Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y))
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn corner(&self, handle: Handle) -> Point {
        match handle {
            Handle::Start => self.start,
            Handle::End => self.end,
        }
    }

    pub fn set_corner(&mut self, handle: Handle, point: Point) {
        match handle {
            Handle::Start => self.start = point,
            Handle::End => self.end = point,
        }
    }
}

/// Which corner of the selection is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    /// The top-left corner.
    Start,
    /// The bottom-right ("final") corner.
    End,
}

/// Ratio between display pixels and image pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayScale {
    pub x: f64,
    pub y: f64,
}

impl DisplayScale {
    /// Scale that maps an `image`-sized raster onto a `display`-sized one.
    pub fn between(image: Size, display: Size) -> Self {
        let ratio = |to: u32, from: u32| {
            if from == 0 {
                1.0
            } else {
                to as f64 / from as f64
            }
        };
        Self {
            x: ratio(display.width, image.width),
            y: ratio(display.height, image.height),
        }
    }

    /// Map an image-space coordinate to display space, rounded to the
    /// nearest pixel.
    pub fn to_display(&self, x: f64, y: f64) -> Point {
        Point::new((x * self.x).round() as f32, (y * self.y).round() as f32)
    }

    /// Map a display-space point back to (unrounded) image space.
    pub fn to_image(&self, point: Point) -> (f64, f64) {
        (point.x as f64 / self.x, point.y as f64 / self.y)
    }

    /// Display-space selection covering an image-space rectangle.
    pub fn map_rect(&self, rect: &PixelRect) -> Selection {
        Selection::new(
            self.to_display(rect.x as f64, rect.y as f64),
            self.to_display(rect.right() as f64, rect.bottom() as f64),
        )
    }
}

/// On-screen placement of the display surface, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A viewport placed at the client origin and shown 1:1 with `size`.
    pub fn unscaled(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    /// Convert a client-space position to the internal pixel grid of a canvas
    /// with the given size. Returns `None` when the viewport has no area.
    pub fn to_canvas(&self, client: Point, canvas: Size) -> Option<Point> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let scale_x = canvas.width as f32 / self.width;
        let scale_y = canvas.height as f32 / self.height;
        Some(Point::new(
            (client.x - self.left) * scale_x,
            (client.y - self.top) * scale_y,
        ))
    }
}

/// Phase of a pointer interaction, shared by mouse and touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the surface or the touch was cancelled.
    Cancel,
}

/// A device-neutral pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub client: Point,
}

impl PointerSample {
    pub const fn new(phase: PointerPhase, client: Point) -> Self {
        Self { phase, client }
    }

    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y))
    }

    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y))
    }

    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y))
    }
}
