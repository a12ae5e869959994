// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workflow — the per-image lifecycle the shell drives: submit an image,
// interact with the resulting edit session, reset, export.
//
// Everything runs on the caller's thread. Detection blocks until done, and a
// new submission replaces the session only once it has fully succeeded.

use std::path::{Path, PathBuf};

use doccrop_bridge::{DisplaySurface, DownloadSink, RawPointerEvent};
use doccrop_core::{AppConfig, Handle, Point};
use doccrop_core::error::{DocCropError, Result};
use doccrop_core::human_errors::{HumanError, humanize_error};
use doccrop_document::{BoundaryDetector, EditSession, ImageProcessor};
use tracing::{info, instrument, warn};

/// What the status line currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Nothing submitted yet.
    Idle,
    /// Work in progress; the message replaces the canvas.
    Processing(String),
    /// A session is ready for editing. Dimensions are of the source image.
    Ready { width: u32, height: u32 },
    /// The last export was written to `path`.
    Exported { path: PathBuf },
    /// The last action failed.
    Failed(HumanError),
}

/// Owns the detector, the current session and the shell collaborators.
pub struct Workflow<S, D> {
    config: AppConfig,
    detector: BoundaryDetector,
    session: Option<EditSession>,
    status: Status,
    surface: S,
    downloads: D,
}

impl<S: DisplaySurface, D: DownloadSink> Workflow<S, D> {
    /// Create a workflow. The configuration is validated up front.
    pub fn new(config: AppConfig, surface: S, downloads: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: BoundaryDetector::new(config.detector.clone()),
            config,
            session: None,
            status: Status::Idle,
            surface,
            downloads,
        })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    // -- Submission -----------------------------------------------------------

    /// Read an image file (an upload or a bundled sample) and process it.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn submit_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.status = Status::Processing("Loading image...".into());
        let bytes = std::fs::read(path.as_ref()).map_err(|err| self.fail(err.into()))?;
        self.submit_bytes(&bytes)
    }

    /// Decode `bytes`, detect the document and start a new session.
    ///
    /// On failure the previous session, if any, is left untouched.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn submit_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.status = Status::Processing("Processing image...".into());

        let image = ImageProcessor::from_bytes(bytes)
            .map_err(|err| self.fail(err))?
            .into_dynamic();
        let session = EditSession::open(image, &self.detector, self.config.editor.clone());
        self.surface
            .present(session.frame())
            .map_err(|err| self.fail(err))?;

        let size = session.source_size();
        info!(width = size.width, height = size.height, "Image ready for editing");
        self.session = Some(session);
        self.status = Status::Ready {
            width: size.width,
            height: size.height,
        };
        Ok(())
    }

    // -- Editing --------------------------------------------------------------

    /// Route a shell pointer event into the session, presenting the new frame
    /// when the selection moved. Events without a session are ignored.
    pub fn pointer(&mut self, event: &RawPointerEvent) -> Result<()> {
        let (Some(session), Some(sample)) = (self.session.as_mut(), event.to_sample()) else {
            return Ok(());
        };
        if session.handle_pointer(sample, self.surface.viewport()) {
            self.surface.present(session.frame())?;
        }
        Ok(())
    }

    /// Move a corner by name, bypassing hit testing.
    pub fn place_corner(&mut self, handle: Handle, point: Point) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(self.fail(DocCropError::NoSession));
        };
        if session.place_corner(handle, point) {
            self.surface.present(session.frame())?;
        }
        Ok(())
    }

    /// Put the selection back where the detector placed it.
    pub fn reset(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(self.fail(DocCropError::NoSession));
        };
        session.reset();
        self.surface.present(session.frame())
    }

    /// Crop the current selection and hand it to the download sink.
    #[instrument(skip(self))]
    pub fn export(&mut self) -> Result<PathBuf> {
        let Some(session) = self.session.as_ref() else {
            return Err(self.fail(DocCropError::NoSession));
        };
        let crop = match session.export(&self.config.export) {
            Ok(crop) => crop,
            Err(err) => return Err(self.fail(err)),
        };
        let path = self
            .downloads
            .offer(&crop.file_name, &crop.bytes)
            .map_err(|err| self.fail(err))?;
        self.status = Status::Exported { path: path.clone() };
        Ok(path)
    }

    /// Record `err` on the status line and hand it back for propagation.
    fn fail(&mut self, err: DocCropError) -> DocCropError {
        let human = humanize_error(&err);
        warn!(%err, message = %human.message, "Operation failed");
        self.status = Status::Failed(human);
        err
    }
}
