// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// doccrop-document — Document boundary detection and crop editing.
//
// Provides image primitives (box blur, rectangular morphology, area resize),
// the boundary detection pipeline, and the interactive rectangle editor with
// rendering and crop export.

pub mod editor;
pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `doccrop_document::BoundaryDetector` etc.
pub use crate::editor::export::CroppedImage;
pub use crate::editor::session::EditSession;
pub use crate::image::processor::ImageProcessor;
pub use crate::scan::detect::{BoundaryDetector, Detection};
