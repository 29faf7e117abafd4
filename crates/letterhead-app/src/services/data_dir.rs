// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Return the application data directory, creating it if needed.
///
/// An explicit override wins; otherwise `$XDG_DATA_HOME/letterhead`, then
/// `$HOME/.local/share/letterhead`, then `/tmp/letterhead`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs_fallback().join("letterhead"),
    };
    ensure(&dir);
    dir
}

/// Return a subdirectory inside `base` (e.g. "assets"), creating it if needed.
pub fn data_subdir(base: &Path, name: &str) -> PathBuf {
    let dir = base.join(name);
    ensure(&dir);
    dir
}

fn ensure(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
}

fn dirs_fallback() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_created() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = data_dir(Some(&tmp.path().join("nested").join("letterhead")));
        assert!(dir.is_dir());
        assert!(data_subdir(&dir, "assets").is_dir());
    }
}
