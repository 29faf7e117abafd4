// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export service: runs the export engine and hands the artifact to the file
// sink. Nothing reaches the sink unless the whole export succeeded.

use std::future::Future;
use std::path::PathBuf;

use chrono::NaiveDate;
use image::RgbImage;
use letterhead_core::ExportFormat;
use letterhead_core::error::{LetterheadError, Result};
use letterhead_document::{
    BitmapRasterizer, ExportArtifact, ExportEngine, PageRasterizer, RenderedDocument, RenderedPage,
};
use tracing::{info, instrument};

use super::ports::FileSink;

/// The production rasterizer, or the reason it could not be set up.
///
/// Only PDF export needs the letterhead artwork, so a missing assets
/// directory is reported when a page is rasterized rather than at startup.
#[derive(Clone)]
pub enum AppRasterizer {
    Ready(BitmapRasterizer),
    Unavailable(String),
}

impl PageRasterizer for AppRasterizer {
    fn rasterize(&self, page: &RenderedPage) -> impl Future<Output = Result<RgbImage>> + Send {
        let ready = match self {
            Self::Ready(rasterizer) => Ok(rasterizer.clone()),
            Self::Unavailable(reason) => Err(reason.clone()),
        };
        let page = page.clone();
        async move {
            match ready {
                Ok(rasterizer) => rasterizer.rasterize(&page).await,
                Err(reason) => Err(LetterheadError::MissingAsset(reason)),
            }
        }
    }
}

pub struct ExportService<R, S> {
    engine: ExportEngine<R>,
    sink: S,
}

impl<R: PageRasterizer, S: FileSink> ExportService<R, S> {
    pub fn new(engine: ExportEngine<R>, sink: S) -> Self {
        Self { engine, sink }
    }

    /// Export and deliver. Returns the artifact and where the sink put it.
    #[instrument(skip(self, doc), fields(pages = doc.page_count()))]
    pub async fn export(
        &self,
        format: ExportFormat,
        doc: &RenderedDocument,
        date: NaiveDate,
    ) -> Result<(ExportArtifact, PathBuf)> {
        let artifact = self.engine.export(format, doc, date).await?;
        let path = self.sink.deliver(&artifact)?;
        info!(filename = %artifact.filename, path = %path.display(), "export delivered");
        Ok((artifact, path))
    }
}
