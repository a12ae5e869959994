// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectangle editor — the corner-dragging state machine, overlay rendering and
// crop export.

pub mod export;
pub mod render;
pub mod session;

pub use export::CroppedImage;
pub use session::EditSession;
