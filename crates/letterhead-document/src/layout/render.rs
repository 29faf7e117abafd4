// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document renderer: turns paginated bodies into a laid-out document.
//
// Page 0 sits on the letterhead artwork with the template's own insets; every
// later page is plain white with uniform margins. The signer block goes on the
// last page only, which is page 0 when the letter fits on one page.

use letterhead_core::{Insets, LONG_DOCUMENT_PAGES, Signer, TemplateKind};
use serde::Serialize;
use tracing::debug;

use super::paginate::{PageBudget, paginate};

/// Background a page is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageFrame {
    /// The letterhead artwork of the given template.
    Letterhead(TemplateKind),
    /// Plain white.
    Continuation,
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub index: usize,
    pub body: String,
    pub is_first: bool,
    pub is_last: bool,
    pub frame: PageFrame,
    /// Body box insets, percent of the page box.
    pub insets: Insets,
    /// Present on the last page only, and only when a signer is selected.
    pub signer: Option<Signer>,
}

impl RenderedPage {
    /// Whether anything needs to be drawn on top of the background.
    pub fn has_text(&self) -> bool {
        !self.body.is_empty() || self.signer.is_some()
    }
}

/// Advisory, non-blocking warnings about document length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentWarning {
    /// Over 90% of the first-page budget while still on one page.
    ApproachingLimit,
    /// More than `LONG_DOCUMENT_PAGES` pages.
    LongDocument,
}

impl DocumentWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ApproachingLimit => "Approaching page limit",
            Self::LongDocument => "Long document",
        }
    }
}

/// A fully laid-out letter, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    template: TemplateKind,
    pages: Vec<RenderedPage>,
    signer: Option<Signer>,
    char_count: usize,
    warnings: Vec<DocumentWarning>,
}

impl RenderedDocument {
    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn pages(&self) -> &[RenderedPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_multi_page(&self) -> bool {
        self.pages.len() > 1
    }

    /// The signer closing the document, if any.
    pub fn signer(&self) -> Option<&Signer> {
        self.signer.as_ref()
    }

    /// Body length in characters.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn warnings(&self) -> &[DocumentWarning] {
        &self.warnings
    }

    pub fn has_warning(&self, warning: DocumentWarning) -> bool {
        self.warnings.contains(&warning)
    }

    /// The full body, reassembled from the pages.
    pub fn body(&self) -> String {
        self.pages.iter().map(|p| p.body.as_str()).collect()
    }

    /// Label shown above the preview, e.g. "Preview · HRT Letterhead · 3 pages".
    pub fn caption(&self) -> String {
        let mut caption = format!("Preview · {} Letterhead", self.template);
        if self.is_multi_page() {
            caption.push_str(&format!(" · {} pages", self.page_count()));
        }
        caption
    }
}

/// Lay out already-paginated bodies.
pub fn render_document(
    page_bodies: Vec<String>,
    template: TemplateKind,
    signer: Option<&Signer>,
) -> RenderedDocument {
    let page_bodies = if page_bodies.is_empty() {
        vec![String::new()]
    } else {
        page_bodies
    };
    let last = page_bodies.len() - 1;
    let char_count = page_bodies.iter().map(|b| b.chars().count()).sum();

    let mut pages: Vec<RenderedPage> = page_bodies
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            let is_first = index == 0;
            let (frame, insets) = if is_first {
                (PageFrame::Letterhead(template), template.letterhead_insets())
            } else {
                (PageFrame::Continuation, Insets::CONTINUATION)
            };
            RenderedPage {
                index,
                body,
                is_first,
                is_last: index == last,
                frame,
                insets,
                signer: None,
            }
        })
        .collect();

    attach_signer(&mut pages, signer);

    let warnings = compute_warnings(char_count, pages.len(), template);
    debug!(
        template = %template,
        pages = pages.len(),
        char_count,
        ?warnings,
        "document rendered"
    );

    RenderedDocument {
        template,
        pages,
        signer: signer.cloned(),
        char_count,
        warnings,
    }
}

/// Paginate `body` for `template` and lay it out in one step.
pub fn derive_document(body: &str, template: TemplateKind, signer: Option<&Signer>) -> RenderedDocument {
    let bodies = paginate(body, PageBudget::for_template(template));
    render_document(bodies, template, signer)
}

/// Put the signer block on the final page and nowhere else.
fn attach_signer(pages: &mut [RenderedPage], signer: Option<&Signer>) {
    for page in pages.iter_mut() {
        page.signer = None;
    }
    if let Some(last) = pages.last_mut() {
        last.signer = signer.cloned();
    }
}

fn compute_warnings(char_count: usize, page_count: usize, template: TemplateKind) -> Vec<DocumentWarning> {
    let mut warnings = Vec::new();
    // len > 0.9 × budget, in integers.
    if page_count == 1 && char_count * 10 > template.first_page_budget() * 9 {
        warnings.push(DocumentWarning::ApproachingLimit);
    }
    if page_count > LONG_DOCUMENT_PAGES {
        warnings.push(DocumentWarning::LongDocument);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterhead_core::SignerId;

    fn signer() -> Signer {
        Signer {
            id: SignerId::new(),
            name: "Lindsay Burden".into(),
            title: "Chief Clinical Operations Officer".into(),
        }
    }

    #[test]
    fn signer_only_on_last_page() {
        let s = signer();
        // 1, 2 and 5 pages on HRT.
        for (len, expected_pages) in [(100, 1), (2000, 2), (1600 + 2100 * 3 + 1, 5)] {
            let doc = derive_document(&"x".repeat(len), TemplateKind::Hrt, Some(&s));
            assert_eq!(doc.page_count(), expected_pages);
            for page in doc.pages() {
                assert_eq!(page.signer.is_some(), page.is_last, "page {}", page.index);
            }
            assert_eq!(doc.pages().last().and_then(|p| p.signer.as_ref()), Some(&s));
        }
    }

    #[test]
    fn first_page_is_letterhead_rest_are_plain() {
        let doc = derive_document(&"y".repeat(5000), TemplateKind::Trt, None);
        let pages = doc.pages();
        assert_eq!(pages[0].frame, PageFrame::Letterhead(TemplateKind::Trt));
        assert_eq!(pages[0].insets.top, 14.5);
        assert!(pages[0].is_first && !pages[0].is_last);
        for page in &pages[1..] {
            assert_eq!(page.frame, PageFrame::Continuation);
            assert_eq!(page.insets, Insets::CONTINUATION);
            assert!(!page.is_first);
        }
        assert!(pages.last().is_some_and(|p| p.is_last));
    }

    #[test]
    fn single_page_is_first_and_last() {
        let doc = derive_document("", TemplateKind::Hrt, None);
        assert_eq!(doc.page_count(), 1);
        let page = &doc.pages()[0];
        assert!(page.is_first && page.is_last);
        assert!(!page.has_text());
    }

    #[test]
    fn multi_page_scenario_has_no_limit_warning() {
        let doc = derive_document(&"a".repeat(3500), TemplateKind::Hrt, None);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1].body.len(), 1900);
        assert!(doc.is_multi_page());
        assert!(!doc.has_warning(DocumentWarning::ApproachingLimit));
        assert_eq!(doc.caption(), "Preview · HRT Letterhead · 2 pages");
    }

    #[test]
    fn near_limit_single_page_warns() {
        let doc = derive_document(&"a".repeat(1450), TemplateKind::Hrt, None);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.has_warning(DocumentWarning::ApproachingLimit));

        let doc = derive_document(&"a".repeat(1440), TemplateKind::Hrt, None);
        assert!(!doc.has_warning(DocumentWarning::ApproachingLimit));

        // Same length is comfortably inside the larger TRT budget.
        let doc = derive_document(&"a".repeat(1450), TemplateKind::Trt, None);
        assert!(doc.warnings().is_empty());
        assert_eq!(doc.caption(), "Preview · TRT Letterhead");
    }

    #[test]
    fn long_document_warning_after_ten_pages() {
        let ten = 1600 + 2100 * 9;
        let doc = derive_document(&"c".repeat(ten), TemplateKind::Hrt, None);
        assert_eq!(doc.page_count(), 10);
        assert!(!doc.has_warning(DocumentWarning::LongDocument));

        let doc = derive_document(&"c".repeat(ten + 1), TemplateKind::Hrt, None);
        assert_eq!(doc.page_count(), 11);
        assert!(doc.has_warning(DocumentWarning::LongDocument));
    }

    #[test]
    fn body_reassembles() {
        let body = "Dear colleague,\n\n".repeat(200);
        let doc = derive_document(&body, TemplateKind::Hrt, Some(&signer()));
        assert_eq!(doc.body(), body);
        assert_eq!(doc.char_count(), body.chars().count());
    }
}
