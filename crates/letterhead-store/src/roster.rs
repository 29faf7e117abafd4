// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signer roster persistence.

use std::sync::Arc;

use letterhead_core::SignerDirectory;
use tracing::{debug, info, warn};

use crate::keys;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct RosterStore {
    store: Arc<dyn KeyValueStore>,
}

impl RosterStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted roster, or the built-in default roster when nothing
    /// usable is stored. The selection is never persisted.
    ///
    /// When nothing is stored, the seeded default roster is saved straight
    /// away so its signer ids stay stable across sessions; drafts refer to
    /// signers by id. An unreadable stored roster is never overwritten here.
    pub fn load_or_default(&self) -> SignerDirectory {
        match self.store.get(keys::SIGNERS) {
            Ok(Some(json)) => match serde_json::from_str::<SignerDirectory>(&json) {
                Ok(directory) => {
                    debug!(signers = directory.len(), "signer roster loaded");
                    return directory;
                }
                Err(e) => {
                    // Keep the stored roster for inspection; reseeding would
                    // orphan drafts that point at its signer ids.
                    warn!(error = %e, "stored signer roster is unreadable, using defaults for this run");
                    return SignerDirectory::with_default_roster();
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "signer roster load failed");
                return SignerDirectory::with_default_roster();
            }
        }
        info!("seeding default signer roster");
        let directory = SignerDirectory::with_default_roster();
        self.save(&directory);
        directory
    }

    pub fn save(&self, directory: &SignerDirectory) {
        let result = serde_json::to_string(directory)
            .map_err(Into::into)
            .and_then(|json| self.store.set(keys::SIGNERS, &json));
        match result {
            Ok(()) => debug!(signers = directory.len(), "signer roster saved"),
            Err(e) => warn!(error = %e, "signer roster save failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn seeds_default_roster() {
        let roster = RosterStore::new(Arc::new(MemoryStore::new()));
        let directory = roster.load_or_default();
        assert_eq!(directory.len(), 3);
        assert!(directory.find("lindsay burden").is_some());
    }

    #[test]
    fn seeded_ids_are_stable() {
        let roster = RosterStore::new(Arc::new(MemoryStore::new()));
        let first = roster.load_or_default();
        let second = roster.load_or_default();
        assert_eq!(first.signers(), second.signers());
    }

    #[test]
    fn edits_survive_reload_without_selection() {
        let roster = RosterStore::new(Arc::new(MemoryStore::new()));
        let mut directory = roster.load_or_default();
        let id = directory.add("Ada Lovelace", "Medical Director").expect("add");
        directory.select(Some(id)).expect("select");
        roster.save(&directory);

        let reloaded = roster.load_or_default();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded.get(id).map(|s| s.title.as_str()), Some("Medical Director"));
        assert_eq!(reloaded.selected_id(), None);
    }

    #[test]
    fn unreadable_roster_is_not_overwritten() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::SIGNERS, "{not json").expect("set");
        let roster = RosterStore::new(kv.clone());

        assert_eq!(roster.load_or_default().len(), 3);
        assert_eq!(kv.get(keys::SIGNERS).expect("get").as_deref(), Some("{not json"));
    }

    #[test]
    fn empty_roster_is_respected() {
        let roster = RosterStore::new(Arc::new(MemoryStore::new()));
        roster.save(&SignerDirectory::new());
        assert!(roster.load_or_default().is_empty());
    }
}
