// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the conversion boundary.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Nothing is retried automatically, so severity only tells the caller whether
// a different choice on their side can help.

use crate::error::PassformError;
use crate::types::{MAX_TARGET_KB, MIN_TARGET_KB};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it by choosing another file, format, or size.
    ActionRequired,
    /// The file itself cannot be processed.
    Permanent,
    /// This installation lacks a capability (e.g. the PDF renderer).
    Unavailable,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}\n{}", self.message, self.suggestion)
    }
}

/// Convert a `PassformError` into the single message shown to the user.
pub fn humanize_error(err: &PassformError) -> HumanError {
    match err {
        PassformError::UnsupportedFormat(tag) => HumanError {
            message: format!("\"{tag}\" is not an output type we can produce."),
            suggestion: "Choose one of: jpg, jpeg, png, webp, bmp, tiff, pdf.".into(),
            severity: Severity::ActionRequired,
        },

        PassformError::UnsupportedInput(detail) => HumanError {
            message: "Unsupported input file type.".into(),
            suggestion: format!(
                "Upload a JPEG, PNG, WebP, BMP, or TIFF image, or a PDF. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        PassformError::InvalidBudget(detail) => HumanError {
            message: "That target size can't be used.".into(),
            suggestion: format!(
                "Pick a size between {MIN_TARGET_KB} KB and {MAX_TARGET_KB} KB. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        PassformError::RasterizerUnavailable(_) => HumanError {
            message: "Turning a PDF into an image isn't available here.".into(),
            suggestion: "Install the pdfium library (or point the config at it), or choose PDF as the output type.".into(),
            severity: Severity::Unavailable,
        },

        PassformError::DecodeFailure(_) => HumanError {
            message: "We couldn't read this file.".into(),
            suggestion: "The file may be damaged or mislabelled. Try opening it in another program and saving it again.".into(),
            severity: Severity::Permanent,
        },

        PassformError::RenderFailure(_) => HumanError {
            message: "We couldn't render a page from this file.".into(),
            suggestion: "The PDF may be empty or damaged. Check that it opens in a PDF viewer.".into(),
            severity: Severity::Permanent,
        },

        PassformError::EncodeFailure(_) => HumanError {
            message: "We couldn't save the image in that format.".into(),
            suggestion: "Try a different output type, such as jpg or png.".into(),
            severity: Severity::ActionRequired,
        },

        PassformError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick another location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Reading or writing a file failed.".into(),
                    suggestion: format!("Check there is enough disk space. ({io_err})"),
                    severity: Severity::Permanent,
                }
            }
        }

        PassformError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that the config file is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
