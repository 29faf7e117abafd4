// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF export: rasterize every page, then assemble the bitmaps into an A4 PDF.

pub mod raster;
pub mod writer;

use letterhead_core::error::LetterheadError;
use tracing::{info, instrument};

use crate::layout::render::RenderedDocument;
pub use raster::{BitmapRasterizer, FontSet, PageRasterizer};
pub use writer::PdfWriter;

/// Rasterize pages strictly in order and write them out as a PDF.
///
/// The first failing page aborts the export; no partial PDF is produced.
#[instrument(skip_all, fields(pages = doc.page_count(), template = %doc.template()))]
pub async fn render_pdf<R: PageRasterizer>(
    doc: &RenderedDocument,
    rasterizer: &R,
    writer: &PdfWriter,
) -> Result<Vec<u8>, LetterheadError> {
    let mut bitmaps = Vec::with_capacity(doc.page_count());
    for page in doc.pages() {
        bitmaps.push(rasterizer.rasterize(page).await?);
    }
    info!(pages = bitmaps.len(), "pages rasterized");
    writer.create_from_page_bitmaps(&bitmaps)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use image::{Rgb, RgbImage};
    use letterhead_core::TemplateKind;

    use super::*;
    use crate::layout::render::{RenderedPage, derive_document};

    /// Records the order pages were requested in; optionally fails on one.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<usize>>,
        fail_on: Option<usize>,
    }

    impl PageRasterizer for Recording {
        fn rasterize(&self, page: &RenderedPage) -> impl Future<Output = Result<RgbImage, LetterheadError>> + Send {
            let index = page.index;
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(index);
            }
            let fail = self.fail_on == Some(index);
            async move {
                if fail {
                    Err(LetterheadError::Rasterization {
                        page: index,
                        reason: "boom".into(),
                    })
                } else {
                    Ok(RgbImage::from_pixel(62, 88, Rgb([255, 255, 255])))
                }
            }
        }
    }

    #[tokio::test]
    async fn pages_rasterized_in_order() {
        let doc = derive_document(&"x".repeat(6000), TemplateKind::Hrt, None);
        let rasterizer = Recording::default();
        let bytes = render_pdf(&doc, &rasterizer, &PdfWriter::a4()).await.expect("pdf");

        let parsed = lopdf::Document::load_mem(&bytes).expect("parse");
        assert_eq!(parsed.get_pages().len(), doc.page_count());
        assert_eq!(doc.page_count(), 4);
        assert_eq!(
            *rasterizer.seen.lock().expect("lock"),
            (0..doc.page_count()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn failing_page_aborts() {
        let doc = derive_document(&"x".repeat(6000), TemplateKind::Hrt, None);
        let rasterizer = Recording {
            fail_on: Some(1),
            ..Default::default()
        };
        let err = render_pdf(&doc, &rasterizer, &PdfWriter::a4()).await.expect_err("fails");
        assert!(matches!(err, LetterheadError::Rasterization { page: 1, .. }));
        assert_eq!(*rasterizer.seen.lock().expect("lock"), vec![0, 1]);
    }
}
