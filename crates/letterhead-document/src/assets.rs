// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template assets: the letterhead background artwork, one image per
// template kind. Loaded once, read-only afterwards.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use letterhead_core::error::LetterheadError;
use letterhead_core::{PAGE_ASPECT_HEIGHT, PAGE_ASPECT_WIDTH, TemplateKind};
use tracing::{debug, info, instrument, warn};

/// Decoded letterhead backgrounds for both template kinds.
#[derive(Debug, Clone)]
pub struct TemplateAssets {
    hrt: RgbaImage,
    trt: RgbaImage,
}

impl TemplateAssets {
    /// Wrap already-decoded images.
    pub fn from_images(hrt: RgbaImage, trt: RgbaImage) -> Self {
        for (kind, img) in [(TemplateKind::Hrt, &hrt), (TemplateKind::Trt, &trt)] {
            check_aspect(kind, img);
        }
        Self { hrt, trt }
    }

    /// Load `hrt_letterhead.png` and `trt_letterhead.png` from `dir`.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LetterheadError> {
        let dir = dir.as_ref();
        let hrt = load_one(dir, TemplateKind::Hrt)?;
        let trt = load_one(dir, TemplateKind::Trt)?;
        info!("template assets loaded");
        Ok(Self::from_images(hrt, trt))
    }

    /// The artwork at its native resolution.
    pub fn background(&self, kind: TemplateKind) -> &RgbaImage {
        match kind {
            TemplateKind::Hrt => &self.hrt,
            TemplateKind::Trt => &self.trt,
        }
    }

    /// The artwork stretched to exactly `width` x `height`, like a CSS
    /// `background-size: 100% 100%`.
    pub fn background_scaled(&self, kind: TemplateKind, width: u32, height: u32) -> RgbaImage {
        let source = self.background(kind);
        if source.dimensions() == (width, height) {
            return source.clone();
        }
        debug!(
            from_w = source.width(),
            from_h = source.height(),
            width,
            height,
            "scaling letterhead background"
        );
        imageops::resize(source, width, height, FilterType::Triangle)
    }
}

fn load_one(dir: &Path, kind: TemplateKind) -> Result<RgbaImage, LetterheadError> {
    let path = dir.join(kind.asset_file_name());
    let img = image::open(&path).map_err(|err| {
        LetterheadError::MissingAsset(format!("{}: {}", path.display(), err))
    })?;
    Ok(img.to_rgba8())
}

/// Artwork with a different aspect ratio is still usable (it is stretched),
/// but the page insets will no longer line up with the header and footer.
fn check_aspect(kind: TemplateKind, img: &RgbaImage) {
    let expected = PAGE_ASPECT_WIDTH as f64 / PAGE_ASPECT_HEIGHT as f64;
    let actual = img.width() as f64 / img.height().max(1) as f64;
    if (actual - expected).abs() > 0.01 {
        warn!(
            template = %kind,
            width = img.width(),
            height = img.height(),
            "letterhead artwork is not 1242:1755; insets may be misaligned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn picks_background_by_kind() {
        let assets = TemplateAssets::from_images(solid(4, 6, [255, 0, 0, 255]), solid(4, 6, [0, 0, 255, 255]));
        assert_eq!(assets.background(TemplateKind::Hrt).get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(assets.background(TemplateKind::Trt).get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn scales_to_requested_size() {
        let assets = TemplateAssets::from_images(solid(124, 175, [9, 9, 9, 255]), solid(124, 175, [9, 9, 9, 255]));
        let scaled = assets.background_scaled(TemplateKind::Hrt, 62, 88);
        assert_eq!(scaled.dimensions(), (62, 88));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        solid(12, 17, [1, 2, 3, 255])
            .save(dir.path().join("hrt_letterhead.png"))
            .expect("write hrt");
        solid(12, 17, [4, 5, 6, 255])
            .save(dir.path().join("trt_letterhead.png"))
            .expect("write trt");

        let assets = TemplateAssets::load(dir.path()).expect("load");
        assert_eq!(assets.background(TemplateKind::Trt).get_pixel(3, 3), &Rgba([4, 5, 6, 255]));
    }

    #[test]
    fn missing_file_is_missing_asset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TemplateAssets::load(dir.path()).expect_err("nothing there");
        assert!(matches!(err, LetterheadError::MissingAsset(_)));
    }
}
