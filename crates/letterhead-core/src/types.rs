// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Letterhead document generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters that fit on every page after the first, regardless of template.
pub const CONTINUATION_BUDGET: usize = 2100;

/// Documents with more pages than this raise the "long document" warning.
pub const LONG_DOCUMENT_PAGES: usize = 10;

/// Width:height ratio of the template artwork (1242:1755).
pub const PAGE_ASPECT_WIDTH: u32 = 1242;
pub const PAGE_ASPECT_HEIGHT: u32 = 1755;

/// Which letterhead artwork the first page is rendered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    #[serde(rename = "HRT")]
    Hrt,
    #[serde(rename = "TRT")]
    Trt,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Hrt, TemplateKind::Trt];

    /// Characters that fit on the letterhead page of this template.
    ///
    /// Budgets are tuned for ~11.5px Georgia with the template's insets. They
    /// are a character-count heuristic, not font-metric measurement.
    pub fn first_page_budget(&self) -> usize {
        match self {
            Self::Hrt => 1600,
            Self::Trt => 1800,
        }
    }

    /// Characters per continuation page.
    pub fn continuation_budget(&self) -> usize {
        CONTINUATION_BUDGET
    }

    /// Body box insets on the letterhead page, as percentages of the page box.
    pub fn letterhead_insets(&self) -> Insets {
        let top = match self {
            Self::Hrt => 22.0,
            Self::Trt => 14.5,
        };
        // Footer artwork starts at 89.9% of the page height.
        Insets {
            top,
            bottom: 10.1,
            left: 9.0,
            right: 8.0,
        }
    }

    /// Upper-case label as shown to users ("HRT").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hrt => "HRT",
            Self::Trt => "TRT",
        }
    }

    /// Lower-case slug used in filenames ("hrt").
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Hrt => "hrt",
            Self::Trt => "trt",
        }
    }

    /// File name of the background artwork inside the assets directory.
    pub fn asset_file_name(&self) -> &'static str {
        match self {
            Self::Hrt => "hrt_letterhead.png",
            Self::Trt => "trt_letterhead.png",
        }
    }

    /// Parse a user-supplied label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "HRT" => Some(Self::Hrt),
            "TRT" => Some(Self::Trt),
            _ => None,
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Insets of the body box, in percent of the page box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Insets {
    /// Uniform margins used by every continuation page.
    pub const CONTINUATION: Insets = Insets {
        top: 4.0,
        bottom: 8.0,
        left: 9.0,
        right: 8.0,
    };
}

/// Unique identifier for a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerId(pub Uuid);

impl SignerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for SignerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SignerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named party whose name and title close the letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub id: SignerId,
    pub name: String,
    pub title: String,
}

/// The autosaved in-progress letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterDraft {
    #[serde(default)]
    pub body: String,
    #[serde(rename = "template", alias = "templateKind", default, deserialize_with = "template_or_default")]
    pub template_kind: TemplateKind,
    #[serde(default)]
    pub selected_signer_id: Option<SignerId>,
    pub saved_at: DateTime<Utc>,
}

impl LetterDraft {
    pub fn new(body: impl Into<String>, template_kind: TemplateKind, selected_signer_id: Option<SignerId>) -> Self {
        Self {
            body: body.into(),
            template_kind,
            selected_signer_id,
            saved_at: Utc::now(),
        }
    }

    /// An empty body with no signer carries nothing worth persisting.
    pub fn is_meaningful(&self) -> bool {
        !self.body.is_empty() || self.selected_signer_id.is_some()
    }
}

/// Drafts written by older builds may carry a missing, null, or unknown
/// template label; all of those restore as HRT.
fn template_or_default<'de, D>(deserializer: D) -> Result<TemplateKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label
        .as_deref()
        .and_then(TemplateKind::from_label)
        .unwrap_or_default())
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Pdf,
    /// HTML markup labelled as a Word document; not a binary .doc.
    Word,
    PlainText,
    Rtf,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Word,
        ExportFormat::PlainText,
        ExportFormat::Rtf,
        ExportFormat::Html,
    ];

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Word => "application/msword",
            Self::PlainText => "text/plain",
            Self::Rtf => "application/rtf",
            Self::Html => "text/html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "doc",
            Self::PlainText => "txt",
            Self::Rtf => "rtf",
            Self::Html => "html",
        }
    }

    /// Infer the export format from a file extension or short name.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "word" => Some(Self::Word),
            "txt" | "text" => Some(Self::PlainText),
            "rtf" => Some(Self::Rtf),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Zoom factor applied to the on-screen preview only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct PreviewZoom(f32);

impl PreviewZoom {
    pub const MIN: f32 = 0.6;
    pub const MAX: f32 = 1.5;

    /// Build a zoom factor, clamping into `[MIN, MAX]`. Non-finite input
    /// falls back to 1.0.
    pub fn new(factor: f32) -> Self {
        if !factor.is_finite() {
            return Self::default();
        }
        Self(factor.clamp(Self::MIN, Self::MAX))
    }

    pub fn factor(&self) -> f32 {
        self.0
    }
}

impl Default for PreviewZoom {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for PreviewZoom {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<PreviewZoom> for f32 {
    fn from(value: PreviewZoom) -> Self {
        value.0
    }
}
