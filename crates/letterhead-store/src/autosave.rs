// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debounced draft autosave.
//
// Every edit cancels the pending save and schedules a new one after the quiet
// period, so a burst of edits produces a single write carrying the last edit.

use std::sync::Mutex;
use std::time::Duration;

use letterhead_core::LetterDraft;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::draft::DraftStore;

struct Pending {
    draft: LetterDraft,
    handle: JoinHandle<()>,
}

/// Schedules draft saves on the tokio runtime.
///
/// `schedule` must be called from within a runtime context.
pub struct DraftAutosaver {
    drafts: DraftStore,
    debounce: Duration,
    pending: Mutex<Option<Pending>>,
}

impl DraftAutosaver {
    pub fn new(drafts: DraftStore, debounce: Duration) -> Self {
        Self {
            drafts,
            debounce,
            pending: Mutex::new(None),
        }
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Replace any pending save with one for `draft`.
    ///
    /// A draft with nothing in it only cancels the pending save.
    pub fn schedule(&self, draft: LetterDraft) {
        let Ok(mut pending) = self.pending.lock() else {
            warn!("autosave state poisoned; edit not scheduled");
            return;
        };

        if let Some(previous) = pending.take() {
            previous.handle.abort();
        }
        if !draft.is_meaningful() {
            debug!("empty draft; pending autosave cancelled");
            return;
        }

        let drafts = self.drafts.clone();
        let debounce = self.debounce;
        let to_save = draft.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            drafts.save(&to_save);
        });

        *pending = Some(Pending { draft, handle });
    }

    /// Whether a save is scheduled and has not run yet.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.as_ref().is_some_and(|p| !p.handle.is_finished()))
            .unwrap_or(false)
    }

    /// Write the pending draft now instead of waiting out the debounce.
    /// Returns whether a write happened.
    pub fn flush(&self) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            return false;
        };
        let Some(Pending { draft, handle }) = pending.take() else {
            return false;
        };
        if handle.is_finished() {
            return false;
        }
        handle.abort();
        debug!("flushing pending draft");
        self.drafts.save(&draft)
    }

    /// Drop any pending save without writing it.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.take()
        {
            previous.handle.abort();
        }
    }
}

impl Drop for DraftAutosaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use letterhead_core::TemplateKind;
    use letterhead_core::error::Result;

    use super::*;
    use crate::keys;
    use crate::storage::{KeyValueStore, MemoryStore};

    /// Counts writes on top of an in-memory store.
    #[derive(Default)]
    struct Counting {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl KeyValueStore for Counting {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    fn autosaver() -> (Arc<Counting>, DraftAutosaver) {
        let kv = Arc::new(Counting::default());
        let saver = DraftAutosaver::new(DraftStore::new(kv.clone()), Duration::from_millis(600));
        (kv, saver)
    }

    fn draft(body: &str) -> LetterDraft {
        LetterDraft::new(body, TemplateKind::Hrt, None)
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_write() {
        let (kv, saver) = autosaver();
        for body in ["D", "De", "Dea", "Dear", "Dear Dr."] {
            saver.schedule(draft(body));
            settle(100).await;
        }
        assert_eq!(kv.writes.load(Ordering::SeqCst), 0);

        settle(700).await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), 1);
        assert_eq!(saver.drafts().load().map(|d| d.body).as_deref(), Some("Dear Dr."));
        assert!(!saver.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_periods_each_save() {
        let (kv, saver) = autosaver();
        saver.schedule(draft("one"));
        settle(700).await;
        saver.schedule(draft("two"));
        settle(700).await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), 2);
        assert_eq!(saver.drafts().load().map(|d| d.body).as_deref(), Some("two"));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_body_cancels_pending_save() {
        let (kv, saver) = autosaver();
        saver.schedule(draft("typo"));
        settle(100).await;
        saver.schedule(draft(""));
        settle(1000).await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), 0);
        assert_eq!(kv.get(keys::DRAFT).expect("get"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_immediately_once() {
        let (kv, saver) = autosaver();
        saver.schedule(draft("closing"));
        assert!(saver.has_pending());
        assert!(saver.flush());
        assert_eq!(kv.writes.load(Ordering::SeqCst), 1);

        settle(1000).await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), 1);
        assert!(!saver.flush());
    }
}
