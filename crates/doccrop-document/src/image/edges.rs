// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canny edge detection on an already smoothed image.
//
// Gradient strength is the L1 norm `|gx| + |gy|` of the 3x3 Sobel responses
// and no extra smoothing is applied, so the thresholds act directly on the
// caller's blurred image.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// tan(22.5°) in Q15 fixed point.
const TAN_22_5_Q15: i64 = 13573;

const EDGE: u8 = 255;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Weak,
    Strong,
}

/// Binary edge map: 255 on edges, 0 elsewhere.
///
/// A pixel survives non-maximum suppression when its magnitude exceeds `low`
/// and is a local maximum across the gradient direction (quantised to 0°,
/// 45°, 90° or 135°). Survivors above `high` seed edges; the others are kept
/// only when 8-connected to a seed. Both thresholds are floored to integers.
pub fn canny_l1(image: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }
    let (w, h) = (width as usize, height as usize);

    let gx = horizontal_sobel(image);
    let gy = vertical_sobel(image);
    let grad: Vec<(i32, i32)> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| (x[0] as i32, y[0] as i32))
        .collect();
    let magnitude: Vec<i32> = grad.iter().map(|&(x, y)| x.abs() + y.abs()).collect();

    // Out-of-image neighbours count as zero magnitude.
    let mag = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    let low = low.floor() as i32;
    let high = high.floor() as i32;
    let mut marks = vec![Mark::None; w * h];
    let mut seeds = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let m = magnitude[i];
            if m <= low {
                continue;
            }
            let (dx, dy) = grad[i];
            let (xi, yi) = (x as isize, y as isize);
            let ax = dx.unsigned_abs() as i64;
            let ay = (dy.unsigned_abs() as i64) << 15;
            let tan22 = ax * TAN_22_5_Q15;
            let tan67 = tan22 + (ax << 16);

            let is_max = if ay < tan22 {
                m > mag(xi - 1, yi) && m >= mag(xi + 1, yi)
            } else if ay > tan67 {
                m > mag(xi, yi - 1) && m >= mag(xi, yi + 1)
            } else {
                let s: isize = if (dx ^ dy) < 0 { -1 } else { 1 };
                m > mag(xi - s, yi - 1) && m > mag(xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }
            if m > high {
                marks[i] = Mark::Strong;
                seeds.push(i);
            } else {
                marks[i] = Mark::Weak;
            }
        }
    }

    // Hysteresis: grow from the seeds through weak pixels.
    while let Some(i) = seeds.pop() {
        let (x, y) = (i % w, i / w);
        out.put_pixel(x as u32, y as u32, Luma([EDGE]));
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let j = ny * w + nx;
                if marks[j] == Mark::Weak {
                    marks[j] = Mark::Strong;
                    seeds.push(j);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 40x40 image with a vertical step of `rise` levels between columns 19
    /// and 20. The Sobel response on either side of the step is `4 * rise`.
    fn step(rise: u8) -> GrayImage {
        GrayImage::from_fn(40, 40, |x, _| Luma([if x < 20 { 100 } else { 100 + rise }]))
    }

    fn edge_columns(edges: &GrayImage, row: u32) -> Vec<u32> {
        (0..edges.width())
            .filter(|&x| edges.get_pixel(x, row)[0] == EDGE)
            .collect()
    }

    #[test]
    fn strong_step_gives_one_pixel_wide_edge() {
        let edges = canny_l1(&step(12), 40.0, 45.0);
        for row in [0, 10, 39] {
            assert_eq!(edge_columns(&edges, row), vec![19], "row {row}");
        }
    }

    #[test]
    fn weak_only_step_is_dropped() {
        // 44 passes the low threshold but nothing reaches the high one.
        let edges = canny_l1(&step(11), 40.0, 45.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn magnitude_equal_to_low_is_not_an_edge() {
        let edges = canny_l1(&step(10), 0.0, 40.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
        let edges = canny_l1(&step(10), 40.0, 40.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn weak_pixels_connected_to_a_seed_are_kept() {
        // Top half strong (48), bottom half weak (44), one continuous edge.
        let img = GrayImage::from_fn(40, 40, |x, y| {
            let rise = if y < 20 { 12 } else { 11 };
            Luma([if x < 20 { 100 } else { 100 + rise }])
        });
        let edges = canny_l1(&img, 40.0, 45.0);
        assert_eq!(edge_columns(&edges, 5), vec![19]);
        assert_eq!(edge_columns(&edges, 35), vec![19]);
    }

    #[test]
    fn blurred_low_contrast_step_survives() {
        // A 30-level step smeared over five pixels by the 5x5 smoothing blur
        // peaks at 48, just above the high threshold.
        let blurred = crate::image::filters::box_blur(&step(30), 5);
        let edges = canny_l1(&blurred, 40.0, 45.0);
        assert_eq!(edge_columns(&edges, 20), vec![18]);
    }

    #[test]
    fn flat_image_has_no_edges() {
        let edges = canny_l1(&GrayImage::from_pixel(16, 16, Luma([77])), 40.0, 45.0);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }
}
