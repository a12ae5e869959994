// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the UI shell.

use std::path::PathBuf;

use doccrop_core::Viewport;
use doccrop_core::error::Result;
use image::RgbaImage;

/// Where rendered editor frames are shown.
pub trait DisplaySurface {
    /// On-screen placement and size of the surface in client coordinates.
    /// May differ from the frame's pixel size when the page scales it.
    fn viewport(&self) -> Viewport;

    /// Show a freshly rendered frame, replacing the previous one.
    fn present(&mut self, frame: &RgbaImage) -> Result<()>;
}

/// Offers finished artifacts to the user.
pub trait DownloadSink {
    /// Hand over `bytes` under `file_name`. Returns where the file ended up.
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}
