// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quick templates: boilerplate letter bodies with bracketed fields for the
// user to fill in. Each one opens with the date it was inserted.

use chrono::NaiveDate;

/// A built-in letter body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    /// Stable identifier used on the command line.
    pub key: &'static str,
    pub label: &'static str,
    template: &'static str,
}

const DATE_FIELD: &str = "{date}";

pub const SNIPPETS: [Snippet; 3] = [
    Snippet {
        key: "prior-authorization",
        label: "Prior Authorization",
        template: "Date: {date}\n\nTo Whom It May Concern,\n\nWe are writing to request prior authorization for [PATIENT NAME], Date of Birth: [DOB], for the following treatment: [TREATMENT/MEDICATION].\n\nThe patient has been evaluated and it is our clinical determination that this treatment is medically necessary due to [CLINICAL REASON].\n\nPlease find attached supporting clinical documentation. We respectfully request expedited review given the medical urgency of this case.\n\nThank you for your prompt attention to this matter. Please do not hesitate to contact our office at support@fountain.net with any questions.\n\nSincerely,",
    },
    Snippet {
        key: "medical-necessity",
        label: "Medical Necessity",
        template: "Date: {date}\n\nTo Whom It May Concern,\n\nThis letter serves to document the medical necessity of [TREATMENT/MEDICATION] for our patient, [PATIENT NAME], Date of Birth: [DOB].\n\n[PATIENT NAME] has been under our care since [DATE] and presents with [DIAGNOSIS/CONDITION]. After thorough clinical evaluation, we have determined that [TREATMENT/MEDICATION] is medically necessary for the following reasons:\n\n1. [CLINICAL REASON 1]\n2. [CLINICAL REASON 2]\n3. [CLINICAL REASON 3]\n\nAlternative treatments including [ALTERNATIVES] have been considered and deemed insufficient due to [REASON].\n\nIt is our professional medical opinion that proceeding with this treatment is in the best interest of the patient's health and well-being.\n\nSincerely,",
    },
    Snippet {
        key: "prescription",
        label: "Prescription Letter",
        template: "Date: {date}\n\nTo Whom It May Concern,\n\nThis letter confirms that [PATIENT NAME], Date of Birth: [DOB], is currently under the care of Fountain Health and has been prescribed the following:\n\nMedication: [MEDICATION NAME]\nDosage: [DOSAGE]\nFrequency: [FREQUENCY]\nDuration: [DURATION]\n\nThis prescription has been issued following a thorough clinical evaluation and is medically indicated for the treatment of [CONDITION].\n\nIf you have any questions regarding this prescription, please contact our office at support@fountain.net or (213) 237-1454.\n\nSincerely,",
    },
];

impl Snippet {
    /// Look a snippet up by key or label, case-insensitively.
    pub fn find(name: &str) -> Option<&'static Snippet> {
        let name = name.trim();
        SNIPPETS
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(name) || s.label.eq_ignore_ascii_case(name))
    }

    /// The body text dated `date`, e.g. "Date: October 16, 2026".
    pub fn render(&self, date: NaiveDate) -> String {
        self.template
            .replace(DATE_FIELD, &date.format("%B %-d, %Y").to_string())
    }
}
