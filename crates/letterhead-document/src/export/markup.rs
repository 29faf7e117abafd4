// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markup export: the page layout as HTML, either as a standalone web page or
// wrapped for word processors.
//
// The Word variant is HTML with Office namespaces and an `application/msword`
// label. Word opens it as an editable document; it is not a binary .doc.

use std::fmt::Write as _;

use letterhead_core::{Insets, PAGE_ASPECT_HEIGHT, PAGE_ASPECT_WIDTH, Signer};

use crate::layout::render::{PageFrame, RenderedDocument, RenderedPage};

/// Baseline styling embedded in the standalone HTML export.
const BASELINE_CSS: &str = "*{margin:0;padding:0;box-sizing:border-box;}body{background:white;}@media print{@page{margin:0;}}";

/// Serialize the page layout (without any host document around it).
pub fn render_markup(doc: &RenderedDocument) -> String {
    let mut out = String::with_capacity(doc.char_count() + 1024 * doc.page_count());
    out.push_str(
        "<div class=\"letter\" style=\"width: 100%; max-width: 720px; display: flex; flex-direction: column; gap: 12px;\">\n",
    );
    for page in doc.pages() {
        push_page(&mut out, page);
    }
    out.push_str("</div>\n");
    out
}

/// A standalone UTF-8 HTML document.
pub fn html_document(doc: &RenderedDocument, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{BASELINE_CSS}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        render_markup(doc),
    )
}

/// The same markup inside a minimal host document that word processors open
/// as an editable file.
pub fn word_document(doc: &RenderedDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" xmlns=\"http://www.w3.org/TR/REC-html40\">\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n{}</body>\n</html>\n",
        render_markup(doc),
    )
}

fn push_page(out: &mut String, page: &RenderedPage) {
    let background = match page.frame {
        PageFrame::Letterhead(kind) => format!(
            "background-image: url('{}'); background-size: 100% 100%; background-repeat: no-repeat;",
            kind.asset_file_name()
        ),
        PageFrame::Continuation => "background: white;".to_owned(),
    };
    let class = match page.frame {
        PageFrame::Letterhead(_) => "page page-letterhead",
        PageFrame::Continuation => "page page-continuation",
    };

    let _ = writeln!(
        out,
        "  <div class=\"{class}\" data-page=\"{}\" style=\"width: 100%; aspect-ratio: {PAGE_ASPECT_WIDTH} / {PAGE_ASPECT_HEIGHT}; {background} position: relative; font-family: Georgia, serif; font-size: clamp(8px, 1.1vw, 13px); flex-shrink: 0;\">",
        page.index + 1,
    );
    let _ = writeln!(
        out,
        "    <div class=\"page-box\" style=\"position: absolute; {} overflow: hidden; display: flex; flex-direction: column;\">",
        inset_style(&page.insets),
    );
    let _ = writeln!(
        out,
        "      <div class=\"page-body\" style=\"white-space: pre-wrap; line-height: 1.75; color: #1a1a1a; flex: 1; overflow: hidden;\">{}</div>",
        escape_html(&page.body),
    );
    if let Some(signer) = &page.signer {
        push_signer(out, signer);
    }
    out.push_str("    </div>\n  </div>\n");
}

fn push_signer(out: &mut String, signer: &Signer) {
    let _ = writeln!(
        out,
        "      <div class=\"signer\" style=\"margin-top: 4%; flex-shrink: 0;\"><div style=\"font-weight: 700; color: #111;\">{}</div><div style=\"color: #555; font-size: 0.9em;\">{}</div></div>",
        escape_html(&signer.name),
        escape_html(&signer.title),
    );
}

fn inset_style(insets: &Insets) -> String {
    format!(
        "top: {}%; bottom: {}%; left: {}%; right: {}%;",
        percent(insets.top),
        percent(insets.bottom),
        percent(insets.left),
        percent(insets.right),
    )
}

/// Format a percentage with at most two decimals and no trailing zeros.
fn percent(value: f32) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render::derive_document;
    use letterhead_core::{SignerId, TemplateKind};

    fn signer() -> Signer {
        Signer {
            id: SignerId::new(),
            name: "Ada <Admin>".into(),
            title: "R&D".into(),
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;");
    }

    #[test]
    fn one_div_per_page_with_letterhead_first() {
        let doc = derive_document(&"x".repeat(4000), TemplateKind::Hrt, None);
        let markup = render_markup(&doc);
        assert_eq!(markup.matches("class=\"page ").count(), 3);
        assert_eq!(markup.matches("page-letterhead").count(), 1);
        assert!(markup.contains("url('hrt_letterhead.png')"));
        assert!(markup.contains("top: 22%; bottom: 10.1%; left: 9%; right: 8%;"));
        assert!(markup.contains("top: 4%; bottom: 8%;"));
        assert!(markup.contains("aspect-ratio: 1242 / 1755"));
    }

    #[test]
    fn trt_inset_formatting() {
        let doc = derive_document("hi", TemplateKind::Trt, None);
        assert!(render_markup(&doc).contains("top: 14.5%;"));
    }

    #[test]
    fn signer_block_once_on_last_page() {
        let doc = derive_document(&"x".repeat(4000), TemplateKind::Hrt, Some(&signer()));
        let markup = render_markup(&doc);
        assert_eq!(markup.matches("class=\"signer\"").count(), 1);
        let last_page_start = markup.rfind("data-page=\"").expect("pages");
        assert!(markup[last_page_start..].contains("Ada &lt;Admin&gt;"));
        assert!(markup.contains("R&amp;D"));
    }

    #[test]
    fn body_is_escaped() {
        let doc = derive_document("<script>alert(1)</script>\nline", TemplateKind::Hrt, None);
        let markup = render_markup(&doc);
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;alert(1)&lt;/script&gt;\nline"));
    }

    #[test]
    fn html_document_is_standalone() {
        let doc = derive_document("Hello", TemplateKind::Hrt, None);
        let html = html_document(&doc, "Fountain Letter");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<title>Fountain Letter</title>"));
        assert!(html.contains(BASELINE_CSS));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn word_document_wraps_same_markup() {
        let doc = derive_document("Hello", TemplateKind::Trt, Some(&signer()));
        let word = word_document(&doc);
        assert!(word.contains("urn:schemas-microsoft-com:office:word"));
        assert!(word.contains(&render_markup(&doc)));
    }
}
