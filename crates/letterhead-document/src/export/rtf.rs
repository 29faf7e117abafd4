// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RTF export: a minimal rich-text document around the letter body.
//
// Escaping runs in a single pass over the characters, so a backslash and a
// brace are each escaped exactly once and an inserted escape is never
// re-escaped. Characters outside ASCII become `\uN?` control words (UTF-16
// code units as signed 16-bit values) so readers decode them losslessly.

use std::fmt::Write as _;

use letterhead_core::Signer;

/// Document prologue: ANSI, Georgia, 11.5pt (`\fs` is in half-points).
const RTF_HEADER: &str = "{\\rtf1\\ansi\\ansicpg1252\\deff0\\uc1{\\fonttbl{\\f0\\froman Georgia;}}\\f0\\fs23 ";

/// Build the RTF document for `body` and an optional signer.
pub fn to_rtf(body: &str, signer: Option<&Signer>) -> String {
    let mut out = String::with_capacity(RTF_HEADER.len() + body.len() + 64);
    out.push_str(RTF_HEADER);
    push_escaped(&mut out, body);

    if let Some(s) = signer {
        out.push_str("\\par\n{\\b ");
        push_escaped(&mut out, &s.name);
        out.push_str("}\\par\n");
        push_escaped(&mut out, &s.title);
    }

    out.push('}');
    out
}

/// Append `text` with RTF escaping; newlines become paragraph breaks.
fn push_escaped(out: &mut String, text: &str) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\r' => {
                // CRLF is one line break.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\par\n");
            }
            '\n' => out.push_str("\\par\n"),
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }
}
