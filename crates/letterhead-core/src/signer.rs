// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signer directory: the roster of people who may sign a letter, plus the
// single optional selection that closes the current document.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LetterheadError, Result};
use crate::types::{Signer, SignerId};

/// Ordered list of signers with at most one selected.
///
/// The selection is a reference into the roster, never an owner: removing the
/// selected signer clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignerDirectory {
    signers: Vec<Signer>,
    #[serde(skip)]
    selected: Option<SignerId>,
}

impl SignerDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from an existing roster (e.g. loaded from storage).
    pub fn from_signers(signers: Vec<Signer>) -> Self {
        Self {
            signers,
            selected: None,
        }
    }

    /// The roster shipped with a fresh install.
    pub fn with_default_roster() -> Self {
        let mut dir = Self::new();
        for (name, title) in [
            ("Doron Stember", "Chief Medical Officer"),
            ("Lindsay Burden", "Chief Clinical Operations Officer"),
            ("Brandon Shrair", "CEO"),
        ] {
            dir.signers.push(Signer {
                id: SignerId::new(),
                name: name.into(),
                title: title.into(),
            });
        }
        dir
    }

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    pub fn get(&self, id: SignerId) -> Option<&Signer> {
        self.signers.iter().find(|s| s.id == id)
    }

    /// Look a signer up by id string or by case-insensitive name.
    pub fn find(&self, needle: &str) -> Option<&Signer> {
        if let Some(id) = SignerId::parse(needle) {
            return self.get(id);
        }
        let needle = needle.trim();
        self.signers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(needle))
    }

    /// Add a signer. Both fields are trimmed and must be non-empty; on
    /// rejection the directory is left untouched.
    pub fn add(&mut self, name: &str, title: &str) -> Result<SignerId> {
        let name = name.trim();
        let title = title.trim();
        if name.is_empty() {
            return Err(LetterheadError::Validation("signer name is required".into()));
        }
        if title.is_empty() {
            return Err(LetterheadError::Validation("signer title is required".into()));
        }

        let id = SignerId::new();
        self.signers.push(Signer {
            id,
            name: name.to_owned(),
            title: title.to_owned(),
        });
        info!(%id, name, "signer added");
        Ok(id)
    }

    /// Remove a signer by id, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: SignerId) -> Result<Signer> {
        let pos = self
            .signers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| LetterheadError::SignerNotFound(id.to_string()))?;

        if self.selected == Some(id) {
            debug!(%id, "removed signer was selected; clearing selection");
            self.selected = None;
        }
        Ok(self.signers.remove(pos))
    }

    /// Select a signer, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<SignerId>) -> Result<()> {
        if let Some(id) = id
            && self.get(id).is_none()
        {
            return Err(LetterheadError::SignerNotFound(id.to_string()));
        }
        self.selected = id;
        Ok(())
    }

    /// Select `id`, or deselect it if it is already the selection.
    pub fn toggle(&mut self, id: SignerId) -> Result<()> {
        if self.selected == Some(id) {
            self.selected = None;
            Ok(())
        } else {
            self.select(Some(id))
        }
    }

    /// Restore a persisted selection. Ids that no longer exist are dropped
    /// silently, since the roster may have changed since the draft was saved.
    pub fn restore_selection(&mut self, id: Option<SignerId>) {
        self.selected = id.filter(|id| self.get(*id).is_some());
    }

    pub fn selected_id(&self) -> Option<SignerId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Signer> {
        self.selected.and_then(|id| self.get(id))
    }
}
