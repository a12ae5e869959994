// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable status messages for failures.
//
// Every technical error is mapped to plain English with a clear suggestion,
// which the shell shows in place of the loading indicator.

use crate::error::DocCropError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk or display hiccup; trying again may work.
    Transient,
    /// User must do something (pick an image, widen the selection).
    ActionRequired,
    /// Cannot be fixed by retrying: wrong format, broken settings.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same action can succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `DocCropError` into a `HumanError` fit for the status line.
pub fn humanize_error(err: &DocCropError) -> HumanError {
    match err {
        DocCropError::UnsupportedImage(detail) => HumanError {
            message: "This file doesn't look like a picture we can open.".into(),
            suggestion: format!("Try a JPEG or PNG photo of the document. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocCropError::ImageError(detail) => HumanError {
            message: "Something went wrong while processing the picture.".into(),
            suggestion: format!("Try again, or use a different photo. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        DocCropError::EmptySelection { .. } => HumanError {
            message: "The selected area is empty.".into(),
            suggestion: "Drag the corner handles apart so the rectangle covers the document."
                .into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocCropError::NoSession => HumanError {
            message: "No picture loaded yet.".into(),
            suggestion: "Choose a photo of a document first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        DocCropError::InvalidConfig(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or remove the settings file, then start again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocCropError::Bridge(detail) => HumanError {
            message: "The picture couldn't be shown or saved.".into(),
            suggestion: format!("Try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        DocCropError::Io(io) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check the file exists and that there is free space. ({io})"),
            retriable: true,
            severity: Severity::Transient,
        },

        DocCropError::Serialization(detail) => HumanError {
            message: "The settings file couldn't be understood.".into(),
            suggestion: format!("Make sure it is valid JSON. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_asks_for_action() {
        let human = humanize_error(&DocCropError::EmptySelection {
            width: 0,
            height: 12,
        });
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn decode_failure_is_permanent_and_keeps_detail() {
        let human = humanize_error(&DocCropError::UnsupportedImage("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("bad magic"));
    }

    #[test]
    fn io_errors_are_transient() {
        let err = DocCropError::from(std::io::Error::other("disk full"));
        let human = humanize_error(&err);
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::Transient);
    }
}
