// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay rendering: the display image with the selection outline and the two
// corner handles drawn on top.

use doccrop_core::{EditorConfig, Point, Selection};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// Draw a fresh frame: a copy of `display`, the outline between the two
/// corners, then a filled square handle centred on each corner.
///
/// Degenerate and off-canvas selections are drawn as far as they are visible.
pub fn render_frame(display: &RgbaImage, selection: &Selection, config: &EditorConfig) -> RgbaImage {
    let mut frame = display.clone();
    draw_outline(&mut frame, selection, config.stroke_width, Rgba(config.stroke_color));
    for corner in [selection.start, selection.end] {
        draw_handle(&mut frame, corner, config.handle_size, Rgba(config.handle_color));
    }
    frame
}

/// Outline `stroke_width` pixels thick, growing outwards from the corners.
fn draw_outline(frame: &mut RgbaImage, selection: &Selection, stroke_width: u32, color: Rgba<u8>) {
    let origin = selection.origin();
    let (left, top) = (origin.x, origin.y);
    let right = left + selection.width();
    let bottom = top + selection.height();

    for t in 0..stroke_width.max(1) {
        let t = t as f32;
        let (l, r, tp, b) = (left - t, right + t, top - t, bottom + t);
        draw_line_segment_mut(frame, (l, tp), (r, tp), color);
        draw_line_segment_mut(frame, (r, tp), (r, b), color);
        draw_line_segment_mut(frame, (r, b), (l, b), color);
        draw_line_segment_mut(frame, (l, b), (l, tp), color);
    }
}

fn draw_handle(frame: &mut RgbaImage, center: Point, size: u32, color: Rgba<u8>) {
    let size = size.max(1);
    let half = size as f32 / 2.0;
    let x = (center.x - half).round() as i32;
    let y = (center.y - half).round() as i32;
    draw_filled_rect_mut(frame, Rect::at(x, y).of_size(size, size), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> RgbaImage {
        RgbaImage::from_pixel(100, 80, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn draws_outline_and_handles() {
        let config = EditorConfig::default();
        let selection = Selection::new(Point::new(20.0, 10.0), Point::new(70.0, 60.0));
        let frame = render_frame(&blank(), &selection, &config);

        assert_eq!(frame.dimensions(), (100, 80));
        // Handles are 10x10 squares centred on the corners.
        assert_eq!(frame.get_pixel(20, 10).0, config.handle_color);
        assert_eq!(frame.get_pixel(16, 6).0, config.handle_color);
        assert_eq!(frame.get_pixel(70, 60).0, config.handle_color);
        // Outline along the top edge, two pixels thick.
        assert_eq!(frame.get_pixel(45, 10).0, config.stroke_color);
        assert_eq!(frame.get_pixel(45, 9).0, config.stroke_color);
        assert_eq!(frame.get_pixel(45, 8).0, [255, 255, 255, 255]);
        // Interior untouched.
        assert_eq!(frame.get_pixel(45, 35).0, [255, 255, 255, 255]);
    }

    #[test]
    fn source_image_is_not_modified() {
        let display = blank();
        let selection = Selection::new(Point::new(5.0, 5.0), Point::new(50.0, 50.0));
        let _ = render_frame(&display, &selection, &EditorConfig::default());
        assert!(display.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn degenerate_selection_renders() {
        let config = EditorConfig::default();
        let frame = render_frame(&blank(), &Selection::default(), &config);
        assert_eq!(frame.get_pixel(0, 0).0, config.handle_color);
    }

    #[test]
    fn off_canvas_selection_renders() {
        let selection = Selection::new(Point::new(-40.0, -3.0), Point::new(300.0, 500.0));
        let frame = render_frame(&blank(), &selection, &EditorConfig::default());
        assert_eq!(frame.dimensions(), (100, 80));
    }
}
