// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing session: the single source of truth for the letter being written.
//
// The rendered document is never stored; `derive_view` recomputes it from the
// body, template, and selected signer whenever it is needed. Every change to
// those three schedules a debounced draft save.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use letterhead_core::error::{LetterheadError, Result};
use letterhead_core::human_errors::StatusMessage;
use letterhead_core::{AppConfig, LetterDraft, PreviewZoom, Signer, SignerDirectory, SignerId, TemplateKind};
use letterhead_document::snippets::Snippet;
use letterhead_document::{RenderedDocument, derive_document};
use letterhead_store::{DraftAutosaver, Preferences, RosterStore};
use tracing::{debug, info};

use crate::services::ports::Clipboard;

pub struct LetterSession {
    body: String,
    template: TemplateKind,
    signers: SignerDirectory,
    /// A draft found at startup, waiting for the user to restore or dismiss it.
    pending_restore: Option<LetterDraft>,
    dark_mode: bool,
    zoom: PreviewZoom,
    status: Option<StatusMessage>,
    status_ttl: Duration,
    roster: RosterStore,
    prefs: Preferences,
    autosaver: DraftAutosaver,
}

impl LetterSession {
    pub fn new(config: &AppConfig, roster: RosterStore, prefs: Preferences, autosaver: DraftAutosaver) -> Self {
        let signers = roster.load_or_default();
        let pending_restore = autosaver.drafts().load();
        if pending_restore.is_some() {
            info!("saved draft available for restore");
        }

        Self {
            body: String::new(),
            template: config.default_template,
            signers,
            pending_restore,
            dark_mode: prefs.dark_mode(),
            zoom: prefs.preview_zoom(),
            status: None,
            status_ttl: config.status_message_ttl(),
            roster,
            prefs,
            autosaver,
        }
    }

    // -- View -----------------------------------------------------------------

    /// Paginate and lay out the current letter.
    pub fn derive_view(&self) -> RenderedDocument {
        derive_document(&self.body, self.template, self.signers.selected())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn signers(&self) -> &SignerDirectory {
        &self.signers
    }

    pub fn selected_signer(&self) -> Option<&Signer> {
        self.signers.selected()
    }

    // -- Editing --------------------------------------------------------------

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.autosave();
    }

    pub fn set_template(&mut self, template: TemplateKind) {
        self.template = template;
        self.autosave();
    }

    /// Replace the body with a built-in snippet dated `date`.
    pub fn apply_snippet(&mut self, name: &str, date: NaiveDate) -> Result<()> {
        let snippet = Snippet::find(name)
            .ok_or_else(|| LetterheadError::Validation(format!("no quick template named \"{name}\"")))?;
        debug!(snippet = snippet.key, "applying quick template");
        self.set_body(snippet.render(date));
        Ok(())
    }

    /// Select a signer by id or name, or clear the selection with `None`.
    pub fn select_signer(&mut self, needle: Option<&str>) -> Result<()> {
        let id = match needle {
            Some(needle) => Some(self.resolve_signer(needle)?),
            None => None,
        };
        self.signers.select(id)?;
        self.autosave();
        Ok(())
    }

    pub fn add_signer(&mut self, name: &str, title: &str) -> Result<SignerId> {
        let id = self.signers.add(name, title)?;
        self.roster.save(&self.signers);
        Ok(id)
    }

    /// Remove a signer by id or name. Removing the selected signer clears the
    /// selection.
    pub fn remove_signer(&mut self, needle: &str) -> Result<Signer> {
        let id = self.resolve_signer(needle)?;
        let was_selected = self.signers.selected_id() == Some(id);
        let removed = self.signers.remove(id)?;
        self.roster.save(&self.signers);
        if was_selected {
            self.autosave();
        }
        Ok(removed)
    }

    fn resolve_signer(&self, needle: &str) -> Result<SignerId> {
        self.signers
            .find(needle)
            .map(|s| s.id)
            .ok_or_else(|| LetterheadError::SignerNotFound(needle.to_owned()))
    }

    // -- Draft restore --------------------------------------------------------

    pub fn pending_restore(&self) -> Option<&LetterDraft> {
        self.pending_restore.as_ref()
    }

    /// Apply the pending draft and consume the offer. The stored record is
    /// replaced by an autosave of the restored letter, so the content
    /// survives even if nothing else is edited. Returns false when there was
    /// nothing to restore.
    pub fn restore_draft(&mut self) -> bool {
        let Some(draft) = self.pending_restore.take() else {
            return false;
        };
        self.body = draft.body;
        self.template = draft.template_kind;
        self.signers.restore_selection(draft.selected_signer_id);
        self.autosaver.drafts().clear();
        self.autosave();
        info!(template = %self.template, len = self.body.len(), "draft restored");
        true
    }

    /// Drop the restore offer. The persisted draft stays until the next save
    /// overwrites it.
    pub fn dismiss_draft(&mut self) {
        self.pending_restore = None;
    }

    /// Write any pending autosave now.
    pub fn flush(&self) -> bool {
        self.autosaver.flush()
    }

    /// Drop any scheduled save. Used when the letter was loaded for a one-off
    /// command and must not overwrite the saved draft.
    pub fn cancel_autosave(&self) {
        self.autosaver.cancel();
    }

    fn autosave(&self) {
        self.autosaver.schedule(LetterDraft::new(
            self.body.clone(),
            self.template,
            self.signers.selected_id(),
        ));
    }

    // -- Preferences ----------------------------------------------------------

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.prefs.set_dark_mode(enabled);
    }

    /// Preview zoom. Exports never depend on it.
    pub fn zoom(&self) -> PreviewZoom {
        self.zoom
    }

    pub fn set_zoom(&mut self, factor: f32) -> PreviewZoom {
        self.zoom = PreviewZoom::new(factor);
        self.prefs.set_preview_zoom(self.zoom);
        self.zoom
    }

    // -- Status ---------------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage::new(text, self.status_ttl, now));
    }

    pub fn report_error(&mut self, err: &LetterheadError, now: Instant) {
        self.status = Some(StatusMessage::from_error(err, self.status_ttl, now));
    }

    /// The current status line, if it has not expired yet.
    pub fn status(&mut self, now: Instant) -> Option<&str> {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
        }
        self.status.as_ref().map(|s| s.text.as_str())
    }

    /// Copy the raw body to `clipboard`, reporting the outcome on the status
    /// line.
    pub fn copy_body(&mut self, clipboard: &dyn Clipboard, now: Instant) -> Result<()> {
        match clipboard.write_text(&self.body) {
            Ok(()) => {
                self.set_status("Copied to clipboard", now);
                Ok(())
            }
            Err(e) => {
                self.report_error(&e, now);
                Err(e)
            }
        }
    }
}
