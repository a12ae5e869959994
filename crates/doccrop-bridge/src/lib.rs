// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// doccrop-bridge — UI shell abstractions.
//
// The editor never talks to a windowing toolkit directly. It receives
// device-neutral pointer samples, asks a display surface where it sits on
// screen, and hands finished crops to a download sink. This crate defines
// those seams and a headless implementation used by the CLI and in tests.

pub mod headless;
pub mod input;
pub mod traits;

pub use headless::{DirectoryDownloads, HeadlessSurface};
pub use input::{MouseKind, RawPointerEvent, TouchKind};
pub use traits::{DisplaySurface, DownloadSink};
