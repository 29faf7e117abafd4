// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Character-budget pagination.
//
// The first page holds at most `first_page` characters, every later page at
// most `continuation` characters. Splits ignore word boundaries: the budgets
// approximate what fits at the template's font size and are not derived from
// font metrics, so a page break may fall mid-word. Lengths are counted in
// Unicode scalar values, which keeps every split on a UTF-8 boundary.

use std::num::NonZeroUsize;

use letterhead_core::TemplateKind;

/// Per-page character budgets. Both budgets are non-zero, so pagination
/// always makes progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBudget {
    first_page: NonZeroUsize,
    continuation: NonZeroUsize,
}

impl PageBudget {
    /// Returns `None` if either budget is zero.
    pub fn new(first_page: usize, continuation: usize) -> Option<Self> {
        Some(Self {
            first_page: NonZeroUsize::new(first_page)?,
            continuation: NonZeroUsize::new(continuation)?,
        })
    }

    /// Budgets for the given letterhead template.
    pub fn for_template(kind: TemplateKind) -> Self {
        Self {
            first_page: NonZeroUsize::new(kind.first_page_budget()).unwrap_or(NonZeroUsize::MIN),
            continuation: NonZeroUsize::new(kind.continuation_budget()).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn first_page(&self) -> usize {
        self.first_page.get()
    }

    pub fn continuation(&self) -> usize {
        self.continuation.get()
    }

    /// Number of pages a body of `char_len` characters occupies.
    pub fn page_count(&self, char_len: usize) -> usize {
        let overflow = char_len.saturating_sub(self.first_page());
        1 + overflow.div_ceil(self.continuation())
    }
}

/// Split `body` into page bodies.
///
/// An empty body yields a single empty page so a blank letterhead is still
/// rendered. Concatenating the result always reproduces `body` exactly.
pub fn paginate(body: &str, budget: PageBudget) -> Vec<String> {
    if body.is_empty() {
        return vec![String::new()];
    }

    let mut pages = Vec::with_capacity(budget.page_count(body.chars().count()));
    let (first, mut rest) = split_at_char(body, budget.first_page());
    pages.push(first.to_owned());

    while !rest.is_empty() {
        let (chunk, tail) = split_at_char(rest, budget.continuation());
        pages.push(chunk.to_owned());
        rest = tail;
    }

    pages
}

/// Split after the first `n` characters, or return the whole string if it is
/// shorter than that.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}
