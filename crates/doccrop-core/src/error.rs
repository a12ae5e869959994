// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for doccrop.

use thiserror::Error;

/// Top-level error type for all doccrop operations.
#[derive(Debug, Error)]
pub enum DocCropError {
    // -- Input errors --
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Editor errors --
    #[error("selection is empty ({width}x{height}); nothing to export")]
    EmptySelection { width: u32, height: u32 },

    #[error("no image has been processed yet")]
    NoSession,

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Shell collaborators --
    #[error("display bridge error: {0}")]
    Bridge(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocCropError>;
