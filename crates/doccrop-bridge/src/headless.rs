// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless shell for the CLI and for tests: a surface that keeps the last
// frame in memory and a download sink that writes into a directory.

use std::path::{Path, PathBuf};

use doccrop_core::error::{DocCropError, Result};
use doccrop_core::{Size, Viewport};
use image::RgbaImage;
use tracing::{debug, info, instrument};

use crate::traits::{DisplaySurface, DownloadSink};

/// In-memory display surface with a fixed on-screen placement.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Viewport,
    last_frame: Option<RgbaImage>,
    presented: usize,
}

impl HeadlessSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            last_frame: None,
            presented: 0,
        }
    }

    /// A surface shown 1:1 at the client origin.
    pub fn unscaled(size: Size) -> Self {
        Self::new(Viewport::unscaled(size))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Write the last presented frame as an image file (format from the
    /// extension).
    pub fn save_last_frame(&self, path: impl AsRef<Path>) -> Result<()> {
        let frame = self
            .last_frame
            .as_ref()
            .ok_or_else(|| DocCropError::Bridge("no frame has been presented".into()))?;
        frame.save(path.as_ref()).map_err(|err| {
            DocCropError::Bridge(format!(
                "failed to save frame to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

impl DisplaySurface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, frame: &RgbaImage) -> Result<()> {
        self.presented += 1;
        debug!(
            width = frame.width(),
            height = frame.height(),
            presented = self.presented,
            "Frame presented"
        );
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

/// Download sink that saves every offered file into one directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    #[instrument(skip(self, bytes), fields(dir = %self.dir.display(), bytes = bytes.len()))]
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        // Only the final component is honoured so a name can't escape `dir`.
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| DocCropError::Bridge(format!("invalid download name {file_name:?}")))?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), "Download written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn surface_keeps_last_frame() {
        let mut surface = HeadlessSurface::unscaled(Size::new(4, 3));
        assert!(surface.last_frame().is_none());
        assert_eq!(surface.viewport(), Viewport::new(0.0, 0.0, 4.0, 3.0));

        surface.present(&RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]))).unwrap();
        surface.present(&RgbaImage::from_pixel(4, 3, Rgba([9, 9, 9, 255]))).unwrap();

        assert_eq!(surface.presented(), 2);
        assert_eq!(surface.last_frame().unwrap().get_pixel(0, 0).0, [9, 9, 9, 255]);
    }

    #[test]
    fn saving_without_a_frame_fails() {
        let dir = tempfile::tempdir().unwrap();
        let surface = HeadlessSurface::unscaled(Size::new(4, 3));
        let err = surface.save_last_frame(dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, DocCropError::Bridge(_)));
    }

    #[test]
    fn saves_last_frame_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut surface = HeadlessSurface::unscaled(Size::new(5, 2));
        surface.present(&RgbaImage::new(5, 2)).unwrap();
        surface.save_last_frame(&path).unwrap();
        assert_eq!(image::open(&path).unwrap().width(), 5);
    }

    #[test]
    fn downloads_land_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectoryDownloads::new(dir.path().join("out"));
        let path = sink.offer("cropped-image.jpg", b"jpeg").unwrap();
        assert_eq!(path, dir.path().join("out").join("cropped-image.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg");
    }

    #[test]
    fn download_names_cannot_escape() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectoryDownloads::new(dir.path());
        let path = sink.offer("../../etc/cropped-image.jpg", b"x").unwrap();
        assert_eq!(path, dir.path().join("cropped-image.jpg"));
        assert!(sink.offer("..", b"x").is_err());
    }
}
