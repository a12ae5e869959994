// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — locating the document boundary in a photographed page.

pub mod detect;

pub use detect::{BoundaryDetector, Detection};
