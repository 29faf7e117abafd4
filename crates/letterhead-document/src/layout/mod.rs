// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module: character-budget pagination and page rendering.

pub mod paginate;
pub mod render;

pub use paginate::{PageBudget, paginate};
pub use render::{DocumentWarning, PageFrame, RenderedDocument, RenderedPage, derive_document, render_document};
