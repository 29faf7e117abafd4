// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterizer: draws one rendered page into a bitmap for PDF export.
//
// Pages are painted into a dedicated offscreen canvas at unit zoom with 2x
// supersampling, so whatever zoom the on-screen preview uses never reaches the
// exported pixels. The canvas starts opaque white; letterhead artwork is
// alpha-composited over it, so transparent regions of the template come out
// white rather than black.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use letterhead_core::error::LetterheadError;
use letterhead_core::{Insets, PAGE_ASPECT_HEIGHT, PAGE_ASPECT_WIDTH};
use tracing::{debug, instrument};

use crate::assets::TemplateAssets;
use crate::layout::render::{PageFrame, RenderedPage};

/// Supersampling factor applied to the unit-zoom page.
pub const SUPERSAMPLE: f32 = 2.0;

/// Page width in CSS pixels at unit zoom; 2x supersampling gives the
/// template's native 1242 px.
const BASE_PAGE_WIDTH_PX: f32 = 621.0;
const BODY_FONT_PX: f32 = 11.5;
const LINE_HEIGHT: f32 = 1.75;
/// Gap above the signer block, percent of the body box width.
const SIGNER_GAP_PCT: f32 = 4.0;
const TITLE_EM: f32 = 0.9;

const BODY_COLOR: Rgb<u8> = Rgb([0x1a, 0x1a, 0x1a]);
const NAME_COLOR: Rgb<u8> = Rgb([0x11, 0x11, 0x11]);
const TITLE_COLOR: Rgb<u8> = Rgb([0x55, 0x55, 0x55]);

/// Turns a rendered page into a bitmap.
///
/// Implementations must return an opaque image in the page's 1242:1755 aspect
/// ratio. The PDF pipeline awaits pages strictly in order.
pub trait PageRasterizer {
    fn rasterize(&self, page: &RenderedPage) -> impl Future<Output = Result<RgbImage, LetterheadError>> + Send;
}

/// Regular body face plus an optional bold face for the signer name.
pub struct FontSet {
    regular: FontVec,
    bold: Option<FontVec>,
}

impl FontSet {
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self, LetterheadError> {
        let regular = FontVec::try_from_vec(regular)
            .map_err(|e| LetterheadError::ImageError(format!("invalid body font: {e}")))?;
        let bold = bold
            .map(FontVec::try_from_vec)
            .transpose()
            .map_err(|e| LetterheadError::ImageError(format!("invalid bold font: {e}")))?;
        Ok(Self { regular, bold })
    }

    pub fn load(regular: &Path, bold: Option<&Path>) -> Result<Self, LetterheadError> {
        let regular = std::fs::read(regular)?;
        let bold = bold.map(std::fs::read).transpose()?;
        Self::from_bytes(regular, bold)
    }
}

/// The production rasterizer: template artwork plus text drawn with `ab_glyph`.
#[derive(Clone)]
pub struct BitmapRasterizer {
    assets: Arc<TemplateAssets>,
    fonts: Option<Arc<FontSet>>,
    supersample: f32,
}

impl BitmapRasterizer {
    /// Without fonts only blank pages can be rasterized; pages with text fail
    /// with `MissingFont`.
    pub fn new(assets: TemplateAssets, fonts: Option<FontSet>) -> Self {
        Self {
            assets: Arc::new(assets),
            fonts: fonts.map(Arc::new),
            supersample: SUPERSAMPLE,
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.fonts.is_some()
    }
}

impl PageRasterizer for BitmapRasterizer {
    fn rasterize(&self, page: &RenderedPage) -> impl Future<Output = Result<RgbImage, LetterheadError>> + Send {
        let page = page.clone();
        let assets = Arc::clone(&self.assets);
        let fonts = self.fonts.clone();
        let supersample = self.supersample;

        async move {
            let index = page.index;
            tokio::task::spawn_blocking(move || paint_page(&page, &assets, fonts.as_deref(), supersample))
                .await
                .map_err(|e| LetterheadError::Rasterization {
                    page: index,
                    reason: e.to_string(),
                })?
        }
    }
}

/// Canvas size in device pixels for the given supersampling factor.
pub fn canvas_size(supersample: f32) -> (u32, u32) {
    let width = (BASE_PAGE_WIDTH_PX * supersample).round().max(1.0) as u32;
    let height = (u64::from(width) * u64::from(PAGE_ASPECT_HEIGHT) / u64::from(PAGE_ASPECT_WIDTH)) as u32;
    (width, height)
}

/// Body box in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BodyBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl BodyBox {
    fn from_insets(insets: &Insets, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            left: w * insets.left / 100.0,
            top: h * insets.top / 100.0,
            right: w * (1.0 - insets.right / 100.0),
            bottom: h * (1.0 - insets.bottom / 100.0),
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }
}

#[instrument(skip_all, fields(page = page.index, first = page.is_first, last = page.is_last))]
fn paint_page(
    page: &RenderedPage,
    assets: &TemplateAssets,
    fonts: Option<&FontSet>,
    supersample: f32,
) -> Result<RgbImage, LetterheadError> {
    let (width, height) = canvas_size(supersample);

    let mut backdrop = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    if let PageFrame::Letterhead(kind) = page.frame {
        let background = assets.background_scaled(kind, width, height);
        imageops::overlay(&mut backdrop, &background, 0, 0);
    }
    let mut canvas = DynamicImage::ImageRgba8(backdrop).to_rgb8();

    if !page.has_text() {
        return Ok(canvas);
    }
    let fonts = fonts.ok_or(LetterheadError::MissingFont)?;

    let body_box = BodyBox::from_insets(&page.insets, width, height);
    let font_px = BODY_FONT_PX * supersample;
    let line_h = font_px * LINE_HEIGHT;
    let body_scale = PxScale::from(font_px);
    let left = body_box.left.round() as i32;

    let mut body_bottom = body_box.bottom;
    if let Some(signer) = &page.signer {
        let title_px = font_px * TITLE_EM;
        let title_line_h = title_px * LINE_HEIGHT;
        let gap = body_box.width() * SIGNER_GAP_PCT / 100.0;
        let block_top = (body_box.bottom - gap - line_h - title_line_h).max(body_box.top);
        body_bottom = block_top;

        let name_y = block_top + gap + half_leading(line_h, font_px);
        match &fonts.bold {
            Some(bold) => draw_text_mut(&mut canvas, NAME_COLOR, left, name_y as i32, body_scale, bold, &signer.name),
            None => {
                let offset = (supersample / 2.0).round().max(1.0) as i32;
                for dx in [0, offset] {
                    draw_text_mut(&mut canvas, NAME_COLOR, left + dx, name_y as i32, body_scale, &fonts.regular, &signer.name);
                }
            }
        }

        let title_y = block_top + gap + line_h + half_leading(title_line_h, title_px);
        draw_text_mut(
            &mut canvas,
            TITLE_COLOR,
            left,
            title_y as i32,
            PxScale::from(title_px),
            &fonts.regular,
            &signer.title,
        );
    }

    let lines = wrap_lines(&page.body, body_box.width(), |s| {
        text_size(body_scale, &fonts.regular, s).0 as f32
    });

    // Lines that do not fit entirely inside the body box are clipped.
    let mut y = body_box.top;
    let mut drawn = 0usize;
    for line in &lines {
        if y + line_h > body_bottom + 0.5 {
            break;
        }
        if !line.is_empty() {
            let top = (y + half_leading(line_h, font_px)) as i32;
            draw_text_mut(&mut canvas, BODY_COLOR, left, top, body_scale, &fonts.regular, line);
        }
        y += line_h;
        drawn += 1;
    }

    debug!(
        width,
        height,
        lines = lines.len(),
        drawn,
        "page painted"
    );
    Ok(canvas)
}

fn half_leading(line_h: f32, font_px: f32) -> f32 {
    (line_h - font_px) / 2.0
}

/// Break `text` into lines no wider than `max_width`, as measured by `measure`.
///
/// Hard newlines are kept, as are leading and repeated spaces; words wider
/// than a whole line are broken between characters.
fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut line = String::new();
        // Empty words stand for extra spaces, so emptiness alone cannot tell
        // whether the line has started.
        let mut started = false;

        for word in paragraph.split(' ') {
            if started {
                let candidate = format!("{line} {word}");
                if measure(&candidate) <= max_width {
                    line = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
            }
            started = true;

            if measure(word) <= max_width {
                line.push_str(word);
                continue;
            }

            let mut chunk = String::new();
            for c in word.chars() {
                chunk.push(c);
                if chunk.chars().count() > 1 && measure(&chunk) > max_width {
                    chunk.pop();
                    lines.push(std::mem::take(&mut chunk));
                    chunk.push(c);
                }
            }
            line = chunk;
        }

        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render::derive_document;
    use letterhead_core::{Signer, SignerId, TemplateKind};

    fn assets(px: [u8; 4]) -> TemplateAssets {
        TemplateAssets::from_images(
            RgbaImage::from_pixel(124, 175, Rgba(px)),
            RgbaImage::from_pixel(124, 175, Rgba(px)),
        )
    }

    fn by_chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn canvas_matches_template_resolution() {
        assert_eq!(canvas_size(SUPERSAMPLE), (1242, 1755));
        assert_eq!(canvas_size(1.0), (621, 877));
    }

    #[test]
    fn wraps_on_words() {
        let lines = wrap_lines("the quick brown fox", 9.0, by_chars);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn keeps_hard_breaks_and_blank_lines() {
        let lines = wrap_lines("Dear Sir,\r\n\nBody", 40.0, by_chars);
        assert_eq!(lines, vec!["Dear Sir,", "", "Body"]);
    }

    #[test]
    fn keeps_indentation_and_repeated_spaces() {
        let lines = wrap_lines("   indented\nA  B", 40.0, by_chars);
        assert_eq!(lines, vec!["   indented", "A  B"]);
    }

    #[test]
    fn breaks_overlong_words() {
        let lines = wrap_lines("abcdefghij xy", 4.0, by_chars);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn body_box_uses_insets() {
        let b = BodyBox::from_insets(&TemplateKind::Hrt.letterhead_insets(), 1000, 2000);
        assert!((b.left - 90.0).abs() < 1e-3);
        assert!((b.right - 920.0).abs() < 1e-3);
        assert!((b.top - 440.0).abs() < 1e-3);
        assert!((b.bottom - 1798.0).abs() < 1e-2);
    }

    #[test]
    fn transparent_letterhead_leaves_white_backdrop() {
        let doc = derive_document("", TemplateKind::Hrt, None);
        let img = paint_page(&doc.pages()[0], &assets([200, 0, 0, 0]), None, SUPERSAMPLE).expect("blank page");
        assert_eq!(img.dimensions(), (1242, 1755));
        assert_eq!(img.get_pixel(10, 10), &Rgb([255, 255, 255]));
    }

    #[test]
    fn opaque_letterhead_is_composited() {
        let doc = derive_document("", TemplateKind::Trt, None);
        let img = paint_page(&doc.pages()[0], &assets([200, 0, 0, 255]), None, SUPERSAMPLE).expect("blank page");
        assert_eq!(img.get_pixel(600, 900), &Rgb([200, 0, 0]));
    }

    #[test]
    fn continuation_page_ignores_artwork() {
        let doc = derive_document(&"x".repeat(2000), TemplateKind::Hrt, None);
        let mut page = doc.pages()[1].clone();
        page.body.clear();
        let img = paint_page(&page, &assets([0, 0, 200, 255]), None, SUPERSAMPLE).expect("blank page");
        assert_eq!(img.get_pixel(600, 900), &Rgb([255, 255, 255]));
    }

    #[test]
    fn text_without_font_fails() {
        let signer = Signer {
            id: SignerId::new(),
            name: "A".into(),
            title: "B".into(),
        };
        let doc = derive_document("", TemplateKind::Hrt, Some(&signer));
        let err = paint_page(&doc.pages()[0], &assets([0, 0, 0, 0]), None, SUPERSAMPLE).expect_err("needs font");
        assert!(matches!(err, LetterheadError::MissingFont));
    }

    #[tokio::test]
    async fn rasterizer_runs_off_the_async_thread() {
        let rasterizer = BitmapRasterizer::new(assets([0, 0, 0, 0]), None);
        assert!(!rasterizer.has_fonts());
        let doc = derive_document("", TemplateKind::Hrt, None);
        let img = rasterizer.rasterize(&doc.pages()[0]).await.expect("rasterize");
        assert_eq!(img.dimensions(), canvas_size(SUPERSAMPLE));
    }
}
