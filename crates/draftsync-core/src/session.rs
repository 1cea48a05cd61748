//! Session state: the single mutable cell every component goes through.
//!
//! All mutation happens from main-event-loop callbacks via the contracts
//! below; no component reaches around them. The state is never held
//! across a suspension point: a save attempt acquires the gate, drops the
//! lock for the round trip, and re-enters to reconcile.

use tracing::debug;

use crate::document::{has_changes, DocumentId, EditableDocument, SaveSnapshot};
use crate::error::ClientError;
use crate::gate::{SaveGate, SaveKind, SkipReason};
use crate::history::HistoryView;
use crate::version::{Reconciled, VersionState};
use crate::wire::{SaveData, VersionEntry};

/// What `begin_attempt` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptDecision {
    /// No round trip; the gate was not kept.
    Skip(SkipReason),
    /// The gate is held; the caller must finish or abort the attempt.
    Proceed(PendingSave),
}

/// Content captured at gate acquisition, exactly what will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub kind: SaveKind,
    pub title: String,
    pub body: String,
    pub identity: Option<DocumentId>,
}

/// Combined editor-facing state for one document session.
#[derive(Debug)]
pub struct SessionState {
    document: EditableDocument,
    snapshot: SaveSnapshot,
    versions: VersionState,
    gate: SaveGate,
    history: HistoryView,
    unsaved_changes: bool,
}

impl SessionState {
    /// The snapshot starts equal to the initial content, so an untouched
    /// existing document never autosaves.
    #[must_use]
    pub fn new(identity: Option<DocumentId>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let body = body.into();
        Self {
            snapshot: SaveSnapshot::capture(&title, &body),
            document: EditableDocument::new(identity.clone(), title, body),
            versions: VersionState::new(identity),
            gate: SaveGate::default(),
            history: HistoryView::default(),
            unsaved_changes: false,
        }
    }

    #[must_use]
    pub fn document(&self) -> &EditableDocument {
        &self.document
    }

    #[must_use]
    pub fn identity(&self) -> Option<&DocumentId> {
        self.versions.identity()
    }

    #[must_use]
    pub fn expected_next_version(&self) -> u64 {
        self.versions.expected_next_version()
    }

    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.versions.save_count()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    #[must_use]
    pub fn save_in_flight(&self) -> bool {
        self.gate.is_live()
    }

    /// Refresh the session's view of the editor content.
    pub fn sync_content(&mut self, title: String, body: String) {
        self.document.title = title;
        self.document.body = body;
    }

    /// The host saw an editor input event.
    pub fn note_input(&mut self) {
        self.unsaved_changes = true;
    }

    /// The host form was submitted; it persists through its own channel.
    pub fn form_submitted(&mut self) {
        self.unsaved_changes = false;
    }

    /// Whether leaving the page should ask for confirmation.
    #[must_use]
    pub fn should_prompt_on_unload(&self) -> bool {
        self.unsaved_changes
    }

    /// Decide whether a save is warranted; acquires the gate on `Proceed`.
    ///
    /// Busy is checked first so an overlapping attempt is rejected before
    /// any content inspection.
    pub fn begin_attempt(&mut self, kind: SaveKind) -> AttemptDecision {
        if !self.gate.try_acquire() {
            return AttemptDecision::Skip(SkipReason::Busy);
        }
        if self.document.is_blank() {
            self.gate.release();
            return AttemptDecision::Skip(SkipReason::Empty);
        }
        if !has_changes(&self.document, &self.snapshot) {
            self.gate.release();
            return AttemptDecision::Skip(SkipReason::Unchanged);
        }
        debug!(?kind, "save attempt accepted");
        AttemptDecision::Proceed(PendingSave {
            kind,
            title: self.document.title.clone(),
            body: self.document.body.clone(),
            identity: self.versions.identity().cloned(),
        })
    }

    /// Fold a successful response into version state and reset the
    /// snapshot to the content that was sent. Releases the gate on every
    /// path, including a malformed response.
    pub fn finish_attempt(
        &mut self,
        pending: &PendingSave,
        data: &SaveData,
    ) -> Result<Reconciled, ClientError> {
        let result = self.versions.reconcile(data);
        if result.is_ok() {
            self.snapshot = SaveSnapshot::capture(&pending.title, &pending.body);
            self.document.identity = self.versions.identity().cloned();
            self.unsaved_changes = false;
        }
        self.gate.release();
        result
    }

    /// Release the gate after a failed round trip; everything else stays
    /// unchanged so the next scheduled attempt can retry.
    pub fn abort_attempt(&mut self) {
        self.gate.release();
    }

    /// Open the history view; returns the identity to fetch for.
    pub fn open_history(&mut self) -> Result<DocumentId, ClientError> {
        let Some(identity) = self.versions.identity().cloned() else {
            return Err(ClientError::NoIdentity);
        };
        self.history.open(true)?;
        Ok(identity)
    }

    pub fn history_loaded(
        &mut self,
        entries: Vec<VersionEntry>,
        article_title: Option<String>,
    ) -> Result<(), ClientError> {
        self.history.loaded(entries, article_title)
    }

    pub fn history_load_failed(&mut self) {
        self.history.load_failed();
    }

    pub fn select_version(&mut self, id: u64) -> Result<(), ClientError> {
        self.history.select(id)
    }

    pub fn close_history(&mut self) {
        self.history.close();
    }

    pub fn begin_restore(&mut self) -> Result<u64, ClientError> {
        self.history.begin_restore()
    }

    pub fn restore_failed(&mut self) {
        self.history.restore_failed();
    }

    /// Overwrite the document with restored content and reset the
    /// snapshot to match, so the detector does not immediately re-trigger
    /// a save for content identical to what was just restored.
    pub fn apply_restore(&mut self, title: String, body: String) {
        self.snapshot = SaveSnapshot::capture(&title, &body);
        self.document.title = title;
        self.document.body = body;
        self.history.restore_succeeded();
    }
}
