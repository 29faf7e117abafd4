// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template used when no draft is restored.
    pub default_template: crate::TemplateKind,
    /// Leading component of every exported filename ("fountain-hrt-letter-…").
    pub filename_prefix: String,
    /// Quiet period before an edit is autosaved, in milliseconds.
    pub autosave_debounce_ms: u64,
    /// How long transient status messages stay visible, in milliseconds.
    pub status_message_ms: u64,
    /// Directory holding `hrt_letterhead.png` and `trt_letterhead.png`.
    /// `None` means the `assets` subdirectory of the data directory.
    pub assets_dir: Option<PathBuf>,
    /// TrueType/OpenType face used for body text in PDF export.
    pub body_font: Option<PathBuf>,
    /// Bold face for the signer name. Falls back to a double-struck body face.
    pub bold_font: Option<PathBuf>,
    /// Where exported files are written. `None` means the current directory.
    pub export_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn status_message_ttl(&self) -> Duration {
        Duration::from_millis(self.status_message_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_template: crate::TemplateKind::Hrt,
            filename_prefix: "fountain".into(),
            autosave_debounce_ms: 600,
            status_message_ms: 3000,
            assets_dir: None,
            body_font: None,
            bold_font: None,
            export_dir: None,
        }
    }
}
