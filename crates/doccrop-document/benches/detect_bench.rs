// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the doccrop-document crate. Covers the boundary
// detection pipeline and the per-move overlay redraw on synthetic images.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use doccrop_core::{EditorConfig, PointerSample, Viewport};
use doccrop_document::{BoundaryDetector, EditSession};

/// 640x480 gray frame with a checkerboard "page" from (100, 80) to (540, 400).
fn synthetic_page() -> DynamicImage {
    let img = GrayImage::from_fn(640, 480, |x, y| {
        if !(100..540).contains(&x) || !(80..400).contains(&y) {
            return Luma([128u8]);
        }
        if ((x - 100) / 8 + (y - 80) / 8) % 2 == 0 {
            Luma([235u8])
        } else {
            Luma([20u8])
        }
    });
    DynamicImage::ImageLuma8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full detection: filter chain, area resize and display mapping.
fn bench_detect(c: &mut Criterion) {
    let page = synthetic_page();
    let detector = BoundaryDetector::default();

    c.bench_function("detect (640x480)", |b| {
        b.iter(|| {
            let detection = detector.detect(black_box(&page));
            black_box(detection.bounds);
        });
    });
}

/// One drag step: hit-free move of the active corner plus a redraw.
fn bench_drag_redraw(c: &mut Criterion) {
    let page = synthetic_page();
    let mut session = EditSession::open(page, &BoundaryDetector::default(), EditorConfig::default());
    let viewport = Viewport::unscaled(session.display_size());
    let end = session.selection().end;
    session.handle_pointer(PointerSample::down(end.x, end.y), viewport);

    let mut step = 0u32;
    c.bench_function("drag redraw", |b| {
        b.iter(|| {
            step = (step + 1) % 50;
            let x = end.x - step as f32;
            black_box(session.handle_pointer(PointerSample::moved(x, end.y), viewport));
        });
    });
}

criterion_group!(benches, bench_detect, bench_drag_redraw);
criterion_main!(benches);
