// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages and transient status lines.
//
// Every failure is scoped to the operation that raised it. The severity drives
// how the front end shows it: inline next to the input, as a status line that
// clears itself, or as a persistent notice.

use std::time::{Duration, Instant};

use crate::error::LetterheadError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Bad input; shown next to the field, nothing was changed.
    Inline,
    /// Environment hiccup; shown briefly, the user may simply retry.
    Transient,
    /// Needs a configuration change before retrying makes sense.
    ActionRequired,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LetterheadError` into something a clinic coordinator can act on.
pub fn humanize_error(err: &LetterheadError) -> HumanError {
    match err {
        LetterheadError::Validation(detail) => HumanError {
            message: "Please check the form.".into(),
            suggestion: capitalize(detail),
            retriable: false,
            severity: Severity::Inline,
        },

        LetterheadError::SignerNotFound(_) => HumanError {
            message: "That signer no longer exists.".into(),
            suggestion: "Pick a signer from the list, or add them again.".into(),
            retriable: false,
            severity: Severity::Inline,
        },

        LetterheadError::ExportInProgress => HumanError {
            message: "An export is already running.".into(),
            suggestion: "Wait for it to finish, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LetterheadError::Rasterization { page, .. } => HumanError {
            message: "The PDF could not be created.".into(),
            suggestion: format!("Page {} failed to render. Nothing was saved; try exporting again.", page + 1),
            retriable: true,
            severity: Severity::Transient,
        },

        LetterheadError::MissingFont => HumanError {
            message: "No font is set up for PDF export.".into(),
            suggestion: "Set `body_font` in the settings to a .ttf or .otf file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::MissingAsset(detail) => HumanError {
            message: "The letterhead artwork is missing.".into(),
            suggestion: format!("Make sure the template images are installed. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LetterheadError::PdfError(_) | LetterheadError::ImageError(_) => HumanError {
            message: "The document could not be exported.".into(),
            suggestion: "Try again, or export as Word or HTML instead.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LetterheadError::Clipboard(_) => HumanError {
            message: "Couldn't copy to the clipboard.".into(),
            suggestion: "Allow clipboard access, or select the text and copy it by hand.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LetterheadError::Storage(_) | LetterheadError::Serialization(_) => HumanError {
            message: "Your draft couldn't be saved.".into(),
            suggestion: "You can keep working; export the letter before closing.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LetterheadError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The file couldn't be written.".into(),
                    suggestion: "Choose a folder you have permission to save into.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }
    }
}

fn capitalize(detail: &str) -> String {
    let mut chars = detail.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}

/// A status line that disappears on its own after a few seconds.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    expires_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, ttl: Duration, now: Instant) -> Self {
        Self {
            text: text.into(),
            expires_at: now + ttl,
        }
    }

    /// Status line for a failed operation.
    pub fn from_error(err: &LetterheadError, ttl: Duration, now: Instant) -> Self {
        let human = humanize_error(err);
        Self::new(format!("{} {}", human.message, human.suggestion), ttl, now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_inline() {
        let human = humanize_error(&LetterheadError::Validation("signer name is required".into()));
        assert_eq!(human.severity, Severity::Inline);
        assert_eq!(human.suggestion, "Signer name is required.");
        assert!(!human.retriable);
    }

    #[test]
    fn rasterization_failure_is_retriable() {
        let err = LetterheadError::Rasterization {
            page: 1,
            reason: "boom".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
        assert!(human.suggestion.contains("Page 2"));
    }

    #[test]
    fn missing_font_needs_action() {
        let human = humanize_error(&LetterheadError::MissingFont);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn status_message_expires() {
        let now = Instant::now();
        let msg = StatusMessage::from_error(
            &LetterheadError::Clipboard("denied".into()),
            Duration::from_secs(3),
            now,
        );
        assert!(msg.text.starts_with("Couldn't copy"));
        assert!(!msg.is_expired(now + Duration::from_secs(2)));
        assert!(msg.is_expired(now + Duration::from_secs(3)));
    }
}
