// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: assembles rasterized page bitmaps into an A4 PDF using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use image::RgbImage;
use letterhead_core::error::LetterheadError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

/// A4 in PDF points.
pub const A4_WIDTH_PT: f32 = 595.0;
pub const A4_HEIGHT_PT: f32 = 842.0;

/// Where a bitmap lands on the page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub dpi: f32,
    pub scale_y: f32,
    pub translate_y: f32,
    pub rendered_w_pt: f32,
    pub rendered_h_pt: f32,
}

/// Builds multi-page PDFs, one full-bleed bitmap per page.
pub struct PdfWriter {
    width_pt: f32,
    height_pt: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::a4()
    }
}

impl PdfWriter {
    /// Portrait A4, 595 x 842 pt.
    pub fn a4() -> Self {
        Self {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        (pt_to_mm(self.width_pt), pt_to_mm(self.height_pt))
    }

    /// Fit a bitmap to the full page width, anchored at the top edge.
    ///
    /// If the scaled bitmap would be taller than the page, it is squeezed
    /// vertically to the page height rather than overflowing it.
    pub fn placement(&self, width_px: u32, height_px: u32) -> Placement {
        let dpi = width_px.max(1) as f32 * 72.0 / self.width_pt;
        let natural_h_pt = height_px as f32 / dpi * 72.0;
        let scale_y = if natural_h_pt > self.height_pt {
            self.height_pt / natural_h_pt
        } else {
            1.0
        };
        let rendered_h_pt = natural_h_pt * scale_y;

        Placement {
            dpi,
            scale_y,
            translate_y: self.height_pt - rendered_h_pt,
            rendered_w_pt: self.width_pt,
            rendered_h_pt,
        }
    }

    /// Create a PDF with one page per bitmap, in the order given.
    #[instrument(skip(self, bitmaps), fields(pages = bitmaps.len()))]
    pub fn create_from_page_bitmaps(&self, bitmaps: &[RgbImage]) -> Result<Vec<u8>, LetterheadError> {
        if bitmaps.is_empty() {
            return Err(LetterheadError::PdfError("no pages to write".into()));
        }

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Letter");
        info!(title, pages = bitmaps.len(), "Creating letter PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(bitmaps.len());

        for (index, bitmap) in bitmaps.iter().enumerate() {
            let (width, height) = bitmap.dimensions();
            if width == 0 || height == 0 {
                return Err(LetterheadError::PdfError(format!("page {} bitmap is empty", index + 1)));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(bitmap.as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = self.placement(width, height);
            if placement.scale_y < 1.0 {
                warn!(page = index, scale_y = placement.scale_y, "page bitmap taller than A4; squeezed");
            }

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(placement.translate_y)),
                    scale_x: Some(1.0),
                    scale_y: Some(placement.scale_y),
                    dpi: Some(placement.dpi),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));

            debug!(
                page = index,
                width,
                height,
                rendered_h_pt = placement.rendered_h_pt,
                "Bitmap placed on page"
            );
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}
