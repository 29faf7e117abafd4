// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Letterhead.

use thiserror::Error;

/// Top-level error type for all Letterhead operations.
#[derive(Debug, Error)]
pub enum LetterheadError {
    // -- Input validation --
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("signer not found: {0}")]
    SignerNotFound(String),

    // -- Export errors --
    #[error("an export is already running")]
    ExportInProgress,

    #[error("page rasterization failed on page {page}: {reason}")]
    Rasterization { page: usize, reason: String },

    #[error("no body font configured; text cannot be rasterized")]
    MissingFont,

    #[error("template asset unavailable: {0}")]
    MissingAsset(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Export environment --
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    // -- Storage / persistence --
    #[error("storage error: {0}")]
    Storage(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LetterheadError>;
