// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-channel filters for the detection pipeline: normalised box blur with
// arbitrary (including even) kernel sizes, rectangular binary dilation and
// erosion, binary thresholding and the bounding box of non-zero pixels.
//
// `imageproc` only offers odd, radius-based kernels for these operations, so
// they are implemented here with running sums and prefix counts.

use doccrop_core::PixelRect;
use image::{GrayImage, Luma};
use tracing::trace;

/// Anchor of a kernel of the given size: the centre for odd sizes, the pixel
/// just past the middle for even ones.
fn anchor(size: u32) -> i64 {
    (size / 2) as i64
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// pixel (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(mut index: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    loop {
        if index < 0 {
            index = -index;
        } else if index >= len {
            index = 2 * len - 2 - index;
        } else {
            return index as usize;
        }
    }
}

/// Sliding window sum over one line, windows of `size` samples anchored at
/// `size / 2`, with reflect-101 borders.
fn window_sums(line: &[u32], size: u32, out: &mut [u32]) {
    let len = line.len() as i64;
    let a = anchor(size);
    let size = size as i64;

    let mut sum: u32 = (0..size)
        .map(|j| line[reflect_101(j - a, len)])
        .sum();
    out[0] = sum;
    for x in 1..len {
        sum -= line[reflect_101(x - 1 - a, len)];
        sum += line[reflect_101(x - 1 + size - a, len)];
        out[x as usize] = sum;
    }
}

/// Normalised `size` x `size` box blur with reflect-101 borders.
pub fn box_blur(image: &GrayImage, size: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || size <= 1 {
        return image.clone();
    }
    let (w, h) = (width as usize, height as usize);

    // Horizontal pass.
    let mut rows = vec![0u32; w * h];
    let mut line = vec![0u32; w];
    for y in 0..h {
        for (x, value) in line.iter_mut().enumerate() {
            *value = image.get_pixel(x as u32, y as u32).0[0] as u32;
        }
        window_sums(&line, size, &mut rows[y * w..(y + 1) * w]);
    }

    // Vertical pass over the row sums.
    let area = size * size;
    let mut output = GrayImage::new(width, height);
    let mut column = vec![0u32; h];
    let mut sums = vec![0u32; h];
    for x in 0..w {
        for (y, value) in column.iter_mut().enumerate() {
            *value = rows[y * w + x];
        }
        window_sums(&column, size, &mut sums);
        for (y, &sum) in sums.iter().enumerate() {
            let mean = (sum + area / 2) / area;
            output.put_pixel(x as u32, y as u32, Luma([mean.min(255) as u8]));
        }
    }

    trace!(size, width, height, "box blur applied");
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Morph {
    Dilate,
    Erode,
}

/// One-dimensional pass of a binary morphological operation. Samples outside
/// the line do not take part, so erosion does not eat in from the border.
fn morph_line(line: &[bool], size: u32, op: Morph, out: &mut [bool]) {
    let len = line.len() as i64;
    let mut prefix = Vec::with_capacity(line.len() + 1);
    prefix.push(0u32);
    for &set in line {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + set as u32);
    }

    let a = anchor(size);
    for x in 0..len {
        let lo = (x - a).max(0);
        let hi = (x - a + size as i64 - 1).min(len - 1);
        let count = prefix[(hi + 1) as usize] - prefix[lo as usize];
        out[x as usize] = match op {
            Morph::Dilate => count > 0,
            Morph::Erode => count as i64 == hi - lo + 1,
        };
    }
}

fn morph_rect(image: &GrayImage, size: u32, op: Morph) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let mut rows = vec![false; w * h];
    let mut line = vec![false; w];
    for y in 0..h {
        for (x, set) in line.iter_mut().enumerate() {
            *set = image.get_pixel(x as u32, y as u32).0[0] != 0;
        }
        morph_line(&line, size, op, &mut rows[y * w..(y + 1) * w]);
    }

    let mut output = GrayImage::new(width, height);
    let mut column = vec![false; h];
    let mut result = vec![false; h];
    for x in 0..w {
        for (y, set) in column.iter_mut().enumerate() {
            *set = rows[y * w + x];
        }
        morph_line(&column, size, op, &mut result);
        for (y, &set) in result.iter().enumerate() {
            if set {
                output.put_pixel(x as u32, y as u32, Luma([u8::MAX]));
            }
        }
    }
    output
}

/// Binary dilation with a `size` x `size` all-ones structuring element.
/// Any non-zero pixel counts as foreground; output is 0 or 255.
pub fn dilate_rect(image: &GrayImage, size: u32) -> GrayImage {
    morph_rect(image, size, Morph::Dilate)
}

/// Binary erosion with a `size` x `size` all-ones structuring element.
/// Any non-zero pixel counts as foreground; output is 0 or 255.
pub fn erode_rect(image: &GrayImage, size: u32) -> GrayImage {
    morph_rect(image, size, Morph::Erode)
}

/// `max` where the pixel is strictly above `level`, 0 elsewhere.
pub fn threshold_binary(image: &GrayImage, level: u8, max: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = image.get_pixel(x, y).0[0];
        Luma([if value > level { max } else { 0 }])
    })
}

/// Smallest axis-aligned rectangle containing every non-zero pixel.
///
/// Returns the empty rectangle at the origin when no pixel is set.
pub fn bounding_rect_nonzero(image: &GrayImage) -> PixelRect {
    let mut extent: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        extent = Some(match extent {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    match extent {
        Some((min_x, min_y, max_x, max_y)) => {
            PixelRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
        }
        None => PixelRect::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(width: u32, height: u32, x: u32, y: u32) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        img.put_pixel(x, y, Luma([255]));
        img
    }

    fn set_pixels(img: &GrayImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] != 0)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        // Windows wider than the line bounce more than once.
        assert!(reflect_101(-17, 3) < 3);
        assert_eq!(reflect_101(-4, 1), 0);
    }

    #[test]
    fn box_blur_keeps_uniform_images_uniform() {
        let img = GrayImage::from_pixel(23, 17, Luma([137]));
        for size in [5, 60] {
            let out = box_blur(&img, size);
            assert!(out.pixels().all(|p| p.0[0] == 137), "size {size}");
        }
    }

    #[test]
    fn box_blur_spreads_a_single_pixel() {
        let mut img = GrayImage::new(11, 11);
        img.put_pixel(5, 5, Luma([250]));
        let out = box_blur(&img, 5);
        // 250 / 25 = 10 over the 5x5 neighbourhood.
        assert_eq!(out.get_pixel(5, 5).0[0], 10);
        assert_eq!(out.get_pixel(3, 3).0[0], 10);
        assert_eq!(out.get_pixel(7, 7).0[0], 10);
        assert_eq!(out.get_pixel(2, 5).0[0], 0);
        assert_eq!(out.get_pixel(8, 5).0[0], 0);
    }

    #[test]
    fn even_dilation_extends_further_right_than_left() {
        let out = dilate_rect(&dot(30, 30, 15, 15), 10);
        let bounds = bounding_rect_nonzero(&out);
        // Offsets -5..=4 around each output pixel reach the dot from x in 11..=20.
        assert_eq!(bounds, PixelRect::new(11, 11, 10, 10));
        assert_eq!(set_pixels(&out).len(), 100);
    }

    #[test]
    fn erosion_removes_thin_lines_and_keeps_solid_blocks() {
        let mut img = GrayImage::new(40, 40);
        for y in 0..40 {
            img.put_pixel(3, y, Luma([255]));
        }
        for y in 10..35 {
            for x in 10..35 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let out = erode_rect(&img, 11);
        assert_eq!(out.get_pixel(3, 20).0[0], 0);
        assert_eq!(bounding_rect_nonzero(&out), PixelRect::new(15, 15, 15, 15));
    }

    #[test]
    fn erosion_ignores_pixels_outside_the_image() {
        let img = GrayImage::from_pixel(8, 8, Luma([255]));
        let out = erode_rect(&img, 11);
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn threshold_is_strict() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[199u8, 200, 201][x as usize]]));
        let out = threshold_binary(&img, 200, 255);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 0);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn bounding_rect_of_empty_image_is_degenerate() {
        let rect = bounding_rect_nonzero(&GrayImage::new(50, 20));
        assert!(rect.is_degenerate());
        assert_eq!(rect, PixelRect::default());
    }

    #[test]
    fn bounding_rect_spans_scattered_pixels() {
        let mut img = GrayImage::new(50, 40);
        img.put_pixel(7, 30, Luma([1]));
        img.put_pixel(41, 2, Luma([255]));
        assert_eq!(bounding_rect_nonzero(&img), PixelRect::new(7, 2, 35, 29));
    }
}
