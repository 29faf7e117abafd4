// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Letterhead: Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod signer;
pub mod types;

pub use config::AppConfig;
pub use error::LetterheadError;
pub use signer::SignerDirectory;
pub use types::*;
