// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Draft store: the single in-progress letter, persisted as JSON.
//
// Failures are logged and swallowed: losing an autosave must never interrupt
// editing.

use std::sync::Arc;

use letterhead_core::LetterDraft;
use tracing::{debug, instrument, warn};

use crate::keys;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `draft`. Returns whether anything was written.
    ///
    /// A draft with an empty body and no signer is not saved; any previously
    /// stored draft is left as it was.
    #[instrument(skip_all, fields(len = draft.body.len(), template = %draft.template_kind))]
    pub fn save(&self, draft: &LetterDraft) -> bool {
        if !draft.is_meaningful() {
            debug!("empty draft not saved");
            return false;
        }

        let json = match serde_json::to_string(draft) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "draft could not be serialized");
                return false;
            }
        };

        match self.store.set(keys::DRAFT, &json) {
            Ok(()) => {
                debug!("draft saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "draft save failed");
                false
            }
        }
    }

    /// The persisted draft, if there is one and it parses.
    pub fn load(&self) -> Option<LetterDraft> {
        let json = match self.store.get(keys::DRAFT) {
            Ok(json) => json?,
            Err(e) => {
                warn!(error = %e, "draft load failed");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(error = %e, "stored draft is unreadable; ignoring it");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::DRAFT) {
            warn!(error = %e, "draft clear failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use letterhead_core::error::{LetterheadError, Result};
    use letterhead_core::{SignerId, TemplateKind};

    fn store() -> (Arc<MemoryStore>, DraftStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), DraftStore::new(kv))
    }

    #[test]
    fn save_then_load() {
        let (_, drafts) = store();
        let draft = LetterDraft::new("Dear Dr. Smith,", TemplateKind::Trt, Some(SignerId::new()));
        assert!(drafts.save(&draft));
        assert_eq!(drafts.load(), Some(draft));
    }

    #[test]
    fn empty_draft_is_not_saved() {
        let (kv, drafts) = store();
        assert!(!drafts.save(&LetterDraft::new("", TemplateKind::Hrt, None)));
        assert_eq!(kv.get(keys::DRAFT).expect("get"), None);

        // A signer alone is worth keeping.
        assert!(drafts.save(&LetterDraft::new("", TemplateKind::Hrt, Some(SignerId::new()))));
    }

    #[test]
    fn clear_removes_draft() {
        let (_, drafts) = store();
        drafts.save(&LetterDraft::new("x", TemplateKind::Hrt, None));
        drafts.clear();
        assert_eq!(drafts.load(), None);
    }

    #[test]
    fn legacy_draft_without_template_loads_as_hrt() {
        let (kv, drafts) = store();
        kv.set(keys::DRAFT, r#"{"body":"old","savedAt":"2025-01-02T03:04:05Z"}"#)
            .expect("set");
        let draft = drafts.load().expect("draft");
        assert_eq!(draft.body, "old");
        assert_eq!(draft.template_kind, TemplateKind::Hrt);
        assert_eq!(draft.selected_signer_id, None);
    }

    #[test]
    fn corrupt_draft_is_ignored() {
        let (kv, drafts) = store();
        kv.set(keys::DRAFT, "{not json").expect("set");
        assert_eq!(drafts.load(), None);
    }

    struct Broken;

    impl KeyValueStore for Broken {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(LetterheadError::Storage("disk full".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LetterheadError::Storage("disk full".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(LetterheadError::Storage("disk full".into()))
        }
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let drafts = DraftStore::new(Arc::new(Broken));
        assert!(!drafts.save(&LetterDraft::new("x", TemplateKind::Hrt, None)));
        assert_eq!(drafts.load(), None);
        drafts.clear();
    }
}
