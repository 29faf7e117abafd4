// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text export.

use letterhead_core::Signer;

/// The body verbatim, followed by a blank line and the signer block when a
/// signer is selected. No escaping is applied.
pub fn to_plain_text(body: &str, signer: Option<&Signer>) -> String {
    match signer {
        Some(s) => format!("{body}\n\n{}\n{}", s.name, s.title),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterhead_core::SignerId;

    #[test]
    fn body_only() {
        assert_eq!(to_plain_text("Dear {x} \\ y", None), "Dear {x} \\ y");
    }

    #[test]
    fn signer_block_appended() {
        let signer = Signer {
            id: SignerId::new(),
            name: "Brandon Shrair".into(),
            title: "CEO".into(),
        };
        assert_eq!(
            to_plain_text("Sincerely,", Some(&signer)),
            "Sincerely,\n\nBrandon Shrair\nCEO"
        );
    }
}
