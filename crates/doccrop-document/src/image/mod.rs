// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, area resize, crop and encoding, plus the
// single-channel filters and edge detector used by the detection pipeline.

pub mod edges;
pub mod filters;
pub mod processor;

pub use processor::ImageProcessor;
