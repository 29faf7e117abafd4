// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// letterhead-store: Local persistence for the Letterhead generator.
//
// A small key/value port with a SQLite implementation, and the typed stores
// built on it: the letter draft (with debounced autosave), UI preferences, and
// the signer roster. Persistence is best effort; a failing store never takes
// the session down.

pub mod autosave;
pub mod draft;
pub mod preferences;
pub mod roster;
pub mod storage;

pub use autosave::DraftAutosaver;
pub use draft::DraftStore;
pub use preferences::Preferences;
pub use roster::RosterStore;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

/// Keys under which each record is persisted. Values are JSON.
pub mod keys {
    pub const DRAFT: &str = "fountain_draft";
    pub const DARK_MODE: &str = "fountain_dark_mode";
    pub const PREVIEW_ZOOM: &str = "fountain_preview_zoom";
    pub const SIGNERS: &str = "fountain_signers";
}
