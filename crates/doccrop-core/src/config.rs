// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// The detector constants below were tuned empirically against photographed
// documents. Changing any one of them shifts detection accuracy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocCropError, Result};

/// Box blur applied to the grayscale image before edge detection.
pub const SMOOTHING_KERNEL: u32 = 5;
/// Lower hysteresis threshold for Canny.
pub const CANNY_LOW_THRESHOLD: f32 = 40.0;
/// Upper hysteresis threshold for Canny.
pub const CANNY_HIGH_THRESHOLD: f32 = 45.0;
/// Sobel aperture used for the Canny gradients.
pub const CANNY_APERTURE: u32 = 3;
/// Number of dilate/erode rounds.
pub const CLOSING_ITERATIONS: u32 = 5;
/// Side of the all-ones dilation element.
pub const DILATE_KERNEL: u32 = 10;
/// Side of the all-ones erosion element.
pub const ERODE_KERNEL: u32 = 11;
/// Heavy blur turning the closed edge blob into a soft mass.
/// Equivalent to four passes of a 15x15 blur.
pub const CONSOLIDATION_KERNEL: u32 = 60;
/// Threshold level applied to the consolidated mass.
pub const BINARY_THRESHOLD: u8 = 200;
/// Value written for pixels above the threshold.
pub const BINARY_MAX: u8 = 255;
/// Display width for landscape images.
pub const DISPLAY_LANDSCAPE_WIDTH: u32 = 640;
/// Display height for portrait and square images.
pub const DISPLAY_PORTRAIT_HEIGHT: u32 = 480;

/// Hit-test tolerance around a corner, per axis, in display pixels.
pub const HANDLE_TOLERANCE: f32 = 10.0;
/// Side of the square corner handles, in display pixels.
pub const HANDLE_SIZE: u32 = 10;
/// Width of the rectangle outline, in display pixels.
pub const STROKE_WIDTH: u32 = 2;

/// File name offered for the exported crop.
pub const EXPORT_FILE_NAME: &str = "cropped-image.jpg";
/// JPEG quality used for the exported crop.
pub const EXPORT_JPEG_QUALITY: u8 = 92;

/// Persistent application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub editor: EditorConfig,
    pub export: ExportConfig,
}

/// Parameters of the boundary detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub smoothing_kernel: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub canny_aperture: u32,
    pub closing_iterations: u32,
    pub dilate_kernel: u32,
    pub erode_kernel: u32,
    pub consolidation_kernel: u32,
    pub threshold: u8,
    pub threshold_max: u8,
    pub display_landscape_width: u32,
    pub display_portrait_height: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            smoothing_kernel: SMOOTHING_KERNEL,
            canny_low: CANNY_LOW_THRESHOLD,
            canny_high: CANNY_HIGH_THRESHOLD,
            canny_aperture: CANNY_APERTURE,
            closing_iterations: CLOSING_ITERATIONS,
            dilate_kernel: DILATE_KERNEL,
            erode_kernel: ERODE_KERNEL,
            consolidation_kernel: CONSOLIDATION_KERNEL,
            threshold: BINARY_THRESHOLD,
            threshold_max: BINARY_MAX,
            display_landscape_width: DISPLAY_LANDSCAPE_WIDTH,
            display_portrait_height: DISPLAY_PORTRAIT_HEIGHT,
        }
    }
}

/// Look and feel of the rectangle editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// When false the selection is shown but pointer input is ignored.
    pub interactive: bool,
    pub handle_tolerance: f32,
    pub handle_size: u32,
    pub stroke_width: u32,
    pub stroke_color: [u8; 4],
    pub handle_color: [u8; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            handle_tolerance: HANDLE_TOLERANCE,
            handle_size: HANDLE_SIZE,
            stroke_width: STROKE_WIDTH,
            stroke_color: [255, 0, 0, 255],
            handle_color: [0, 0, 255, 255],
        }
    }
}

/// Where the exported pixels are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// Map the selection back to image space and crop the original.
    #[default]
    SourceResolution,
    /// Crop the downscaled display copy as shown.
    Display,
}

/// Output settings for the cropped image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub mode: ExportMode,
    pub jpeg_quality: u8,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::SourceResolution,
            jpeg_quality: EXPORT_JPEG_QUALITY,
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline or editor cannot honour.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detector;
        let kernels = [
            ("smoothing_kernel", d.smoothing_kernel),
            ("dilate_kernel", d.dilate_kernel),
            ("erode_kernel", d.erode_kernel),
            ("consolidation_kernel", d.consolidation_kernel),
        ];
        for (name, size) in kernels {
            if size == 0 {
                return Err(invalid(format!("{name} must be at least 1")));
            }
        }
        if d.closing_iterations == 0 {
            return Err(invalid("closing_iterations must be at least 1"));
        }
        if d.canny_low > d.canny_high {
            return Err(invalid(format!(
                "canny_low ({}) exceeds canny_high ({})",
                d.canny_low, d.canny_high
            )));
        }
        // The edge detector only has 3x3 Sobel gradients.
        if d.canny_aperture != CANNY_APERTURE {
            return Err(invalid(format!(
                "canny_aperture {} is unsupported, only {CANNY_APERTURE} is available",
                d.canny_aperture
            )));
        }
        if d.display_landscape_width == 0 || d.display_portrait_height == 0 {
            return Err(invalid("display bounds must be non-zero"));
        }

        let e = &self.editor;
        if e.handle_tolerance <= 0.0 {
            return Err(invalid("handle_tolerance must be positive"));
        }
        if e.handle_size == 0 || e.stroke_width == 0 {
            return Err(invalid("handle_size and stroke_width must be non-zero"));
        }

        let x = &self.export;
        if !(1..=100).contains(&x.jpeg_quality) {
            return Err(invalid(format!(
                "jpeg_quality {} is outside 1..=100",
                x.jpeg_quality
            )));
        }
        if x.file_name.trim().is_empty() {
            return Err(invalid("export file_name is empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> DocCropError {
    DocCropError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let config = AppConfig::default();
        assert_eq!(config.detector.smoothing_kernel, 5);
        assert_eq!(config.detector.canny_low, 40.0);
        assert_eq!(config.detector.canny_high, 45.0);
        assert_eq!(config.detector.closing_iterations, 5);
        assert_eq!(config.detector.dilate_kernel, 10);
        assert_eq!(config.detector.erode_kernel, 11);
        assert_eq!(config.detector.consolidation_kernel, 60);
        assert_eq!(config.detector.threshold, 200);
        assert_eq!(config.export.file_name, "cropped-image.jpg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doccrop.json");
        std::fs::write(&path, r#"{ "editor": { "interactive": false } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(!config.editor.interactive);
        assert_eq!(config.editor.handle_size, HANDLE_SIZE);
        assert_eq!(config.detector, DetectorConfig::default());
        assert_eq!(config.export.mode, ExportMode::SourceResolution);
    }

    #[test]
    fn export_mode_uses_snake_case() {
        let config: ExportConfig = serde_json::from_str(r#"{ "mode": "display" }"#).unwrap();
        assert_eq!(config.mode, ExportMode::Display);
    }

    #[test]
    fn rejects_inverted_canny_thresholds() {
        let mut config = AppConfig::default();
        config.detector.canny_low = 90.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DocCropError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unsupported_aperture_and_quality() {
        let mut config = AppConfig::default();
        config.detector.canny_aperture = 5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.export.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(DocCropError::Serialization(_))
        ));
    }
}
