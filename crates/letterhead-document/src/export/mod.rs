// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export engine: turns a rendered document into a downloadable artifact in
// one of five formats.
//
// Only one export runs at a time. A second request while one is in flight is
// rejected with `ExportInProgress` instead of being queued.

pub mod markup;
pub mod pdf;
pub mod rtf;
pub mod text;

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use letterhead_core::error::LetterheadError;
use letterhead_core::{ExportFormat, TemplateKind};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::digest::hash_bytes;
use crate::layout::render::RenderedDocument;
use pdf::{PageRasterizer, PdfWriter};

/// Default HTML `<title>` and PDF /Title.
const DEFAULT_DOCUMENT_TITLE: &str = "Fountain Letter";

/// A finished export, ready to hand to a file sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub sha256: String,
}

impl ExportArtifact {
    pub fn new(filename: String, format: ExportFormat, bytes: Vec<u8>) -> Self {
        let sha256 = hash_bytes(&bytes);
        info!(
            filename = %filename,
            mime_type = format.mime_type(),
            size = bytes.len(),
            sha256 = %sha256,
            "export artifact created"
        );
        Self {
            filename,
            mime_type: format.mime_type(),
            bytes,
            sha256,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `{prefix}-{hrt|trt}-letter-{YYYY-MM-DD}.{ext}`
pub fn export_filename(prefix: &str, kind: TemplateKind, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{prefix}-{}-letter-{}.{}",
        kind.slug(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Produces artifacts for every export format. PDF pages are drawn by `R`.
pub struct ExportEngine<R> {
    rasterizer: R,
    pdf_writer: PdfWriter,
    filename_prefix: String,
    document_title: String,
    busy: AtomicBool,
}

/// Holds the busy flag for the duration of one export.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, LetterheadError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LetterheadError::ExportInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: PageRasterizer> ExportEngine<R> {
    pub fn new(rasterizer: R, filename_prefix: impl Into<String>) -> Self {
        Self {
            rasterizer,
            pdf_writer: PdfWriter::a4().with_title(DEFAULT_DOCUMENT_TITLE),
            filename_prefix: filename_prefix.into(),
            document_title: DEFAULT_DOCUMENT_TITLE.to_owned(),
            busy: AtomicBool::new(false),
        }
    }

    /// Title used for the HTML `<title>` and the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = title.into();
        self.pdf_writer.set_title(self.document_title.clone());
        self
    }

    /// True while an export is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn filename_for(&self, doc: &RenderedDocument, format: ExportFormat, date: NaiveDate) -> String {
        export_filename(&self.filename_prefix, doc.template(), format, date)
    }

    /// Export `doc` as `format`. `date` goes into the filename.
    ///
    /// Fails with `ExportInProgress` if another export on this engine has not
    /// finished yet.
    #[instrument(skip(self, doc), fields(template = %doc.template(), pages = doc.page_count()))]
    pub async fn export(
        &self,
        format: ExportFormat,
        doc: &RenderedDocument,
        date: NaiveDate,
    ) -> Result<ExportArtifact, LetterheadError> {
        let _guard = BusyGuard::acquire(&self.busy).inspect_err(|_| {
            warn!(?format, "export requested while another is running");
        })?;

        let bytes = match format {
            ExportFormat::Pdf => pdf::render_pdf(doc, &self.rasterizer, &self.pdf_writer).await?,
            ExportFormat::Word => markup::word_document(doc).into_bytes(),
            ExportFormat::Html => markup::html_document(doc, &self.document_title).into_bytes(),
            ExportFormat::PlainText => text::to_plain_text(&doc.body(), doc.signer()).into_bytes(),
            ExportFormat::Rtf => rtf::to_rtf(&doc.body(), doc.signer()).into_bytes(),
        };

        Ok(ExportArtifact::new(self.filename_for(doc, format, date), format, bytes))
    }
}
