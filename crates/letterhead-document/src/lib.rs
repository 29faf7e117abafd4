// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// letterhead-document: Document pipeline for the Letterhead generator.
//
// Splits a letter body into pages by character budget, lays the pages out over
// the letterhead artwork, and exports the result as PDF (rasterized pages),
// Word-compatible markup, plain text, RTF, or HTML.

pub mod assets;
pub mod digest;
pub mod export;
pub mod layout;
pub mod snippets;

// Re-export the primary entry points so callers can use `letterhead_document::paginate` etc.
pub use assets::TemplateAssets;
pub use export::pdf::raster::{BitmapRasterizer, FontSet, PageRasterizer};
pub use export::pdf::writer::PdfWriter;
pub use export::{ExportArtifact, ExportEngine, export_filename};
pub use layout::paginate::{PageBudget, paginate};
pub use layout::render::{DocumentWarning, PageFrame, RenderedDocument, RenderedPage, derive_document};
