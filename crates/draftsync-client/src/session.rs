//! Save/restore orchestration.
//!
//! [`Session`] owns the state machine behind a mutex and drives every
//! round trip. The mutex is never held across an await: each operation
//! re-enters the state to record what the server answered. The save gate
//! acquired in `begin_attempt` is covered by an RAII guard, so a failed
//! or cancelled round trip can never leave the gate stuck.

use std::sync::Arc;

use draftsync_core::document::DocumentId;
use draftsync_core::error::ClientError;
use draftsync_core::gate::{SaveKind, SaveOutcome, SaveReceipt, SkipReason};
use draftsync_core::session::{AttemptDecision, SessionState};
use draftsync_core::status::{StatusLevel, StatusSink};
use draftsync_core::wire::{DocumentStatus, PublishData, SaveRequest, VersionEntry};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::host::EditorHost;
use crate::transport::Transport;

/// One editing session for one document.
///
/// Cheap to clone; clones share all state. The scheduler and any
/// fire-and-forget tasks hold their own clone.
pub struct Session<T: Transport> {
    state: Arc<Mutex<SessionState>>,
    transport: Arc<T>,
    host: Arc<dyn EditorHost>,
    sink: Arc<dyn StatusSink>,
    config: SessionConfig,
}

impl<T: Transport> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            transport: Arc::clone(&self.transport),
            host: Arc::clone(&self.host),
            sink: Arc::clone(&self.sink),
            config: self.config.clone(),
        }
    }
}

/// Releases the save gate unless the attempt reached `finish_attempt`,
/// which releases it itself.
struct GateGuard {
    state: Arc<Mutex<SessionState>>,
    armed: bool,
}

impl GateGuard {
    fn new(state: Arc<Mutex<SessionState>>) -> Self {
        Self { state, armed: true }
    }

    fn defuse(&mut self) {
        self.armed = false;
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().abort_attempt();
        }
    }
}

impl<T: Transport> Session<T> {
    /// The session reads the initial content from the host, so an
    /// untouched existing document never autosaves.
    #[must_use]
    pub fn new(
        transport: T,
        host: Arc<dyn EditorHost>,
        sink: Arc<dyn StatusSink>,
        config: SessionConfig,
        identity: Option<DocumentId>,
    ) -> Self {
        let state = SessionState::new(identity, host.title(), host.body());
        Self {
            state: Arc::new(Mutex::new(state)),
            transport: Arc::new(transport),
            host,
            sink,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn identity(&self) -> Option<DocumentId> {
        self.state.lock().identity().cloned()
    }

    #[must_use]
    pub fn expected_next_version(&self) -> u64 {
        self.state.lock().expected_next_version()
    }

    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.state.lock().save_count()
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.lock().has_unsaved_changes()
    }

    #[must_use]
    pub fn save_in_flight(&self) -> bool {
        self.state.lock().save_in_flight()
    }

    #[must_use]
    pub fn history_entries(&self) -> Vec<VersionEntry> {
        self.state.lock().history().entries().to_vec()
    }

    #[must_use]
    pub fn history_selected(&self) -> Option<u64> {
        self.state.lock().history().selected()
    }

    #[must_use]
    pub fn history_is_open(&self) -> bool {
        !self.state.lock().history().is_closed()
    }

    #[must_use]
    pub fn can_restore(&self) -> bool {
        self.state.lock().history().can_restore()
    }

    /// The host saw an editor input event.
    pub fn note_input(&self) {
        self.state.lock().note_input();
    }

    /// The host form was submitted; it persists through its own channel.
    pub fn form_submitted(&self) {
        self.state.lock().form_submitted();
    }

    /// Run one save attempt end to end.
    ///
    /// Skips are successful no-ops: no-change and empty skips stay silent,
    /// and only a manual attempt surfaces "already saving". Failures leave
    /// the snapshot and version state untouched so the next tick retries
    /// the same content.
    pub async fn save(&self, kind: SaveKind) -> Result<SaveOutcome, ClientError> {
        let decision = {
            let mut state = self.state.lock();
            state.sync_content(self.host.title(), self.host.body());
            state.begin_attempt(kind)
        };
        let pending = match decision {
            AttemptDecision::Skip(reason) => {
                debug!(?kind, ?reason, "save skipped");
                if reason == SkipReason::Busy && kind == SaveKind::Manual {
                    self.sink
                        .report("A save is already in progress", StatusLevel::Info);
                }
                return Ok(SaveOutcome::Skipped(reason));
            }
            AttemptDecision::Proceed(pending) => pending,
        };

        let mut guard = GateGuard::new(Arc::clone(&self.state));
        self.sink.report("Saving...", StatusLevel::Info);

        let request = SaveRequest {
            title: pending.title.clone(),
            body: pending.body.clone(),
            save_type: pending.kind,
            category_id: self.host.category_id(),
            show_toc: self.host.show_toc(),
            article_order: self.host.article_order(),
        };
        let response = self
            .transport
            .save(pending.identity.as_ref(), &request)
            .await;

        let data = match response {
            Err(err) => return Err(self.report_failure(kind.label(), err)),
            Ok(response) if !response.success => {
                let message = response
                    .message
                    .unwrap_or_else(|| "save rejected".to_owned());
                return Err(self.report_failure(kind.label(), ClientError::Rejected(message.into())));
            }
            Ok(response) => match response.data {
                Some(data) => data,
                None => {
                    return Err(self.report_failure(
                        kind.label(),
                        ClientError::MalformedResponse("save response carried no data".into()),
                    ))
                }
            },
        };

        guard.defuse();
        let (reconciled, identity) = {
            let mut state = self.state.lock();
            let reconciled = state.finish_attempt(&pending, &data);
            (reconciled, state.identity().cloned())
        };
        let reconciled = match reconciled {
            Ok(reconciled) => reconciled,
            Err(err) => return Err(self.report_failure(kind.label(), err)),
        };
        // The gate held off concurrent saves, so the identity recorded by
        // finish_attempt is the one this response established.
        let identity = identity.ok_or_else(|| {
            ClientError::MalformedResponse("save reconciled without an identity".into())
        })?;
        if let Some(new_identity) = &reconciled.newly_identified {
            self.host.document_identified(new_identity);
        }

        let message = match data.human_time.as_deref() {
            Some(human_time) => format!("{} succeeded ({human_time})", kind.label()),
            None => format!("{} succeeded", kind.label()),
        };
        self.sink.report(&message, StatusLevel::Success);
        self.sink
            .render_status(&DocumentStatus::from_save(identity.clone(), kind, &data));

        Ok(SaveOutcome::Saved(SaveReceipt {
            kind,
            identity,
            version: reconciled.version,
            human_time: data.human_time.clone(),
            is_draft: data.is_draft.unwrap_or(true),
        }))
    }

    /// Explicit user-triggered save.
    pub async fn manual_save(&self) -> Result<SaveOutcome, ClientError> {
        self.save(SaveKind::Manual).await
    }

    /// Page-leave hook. Returns whether the host should prompt the user,
    /// and fires one last best-effort save when changes are pending.
    pub fn on_unload(&self) -> bool {
        let prompt = {
            let mut state = self.state.lock();
            state.sync_content(self.host.title(), self.host.body());
            state.should_prompt_on_unload()
        };
        if prompt {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let session = self.clone();
                handle.spawn(async move {
                    if let Err(err) = session.save(SaveKind::Auto).await {
                        warn!(%err, "final save on unload failed");
                    }
                });
            }
        }
        prompt
    }

    /// Open the version browser and fetch the list.
    pub async fn open_history(&self) -> Result<(), ClientError> {
        let identity = match self.state.lock().open_history() {
            Ok(identity) => identity,
            Err(err) => {
                self.sink
                    .report("Save the document before browsing versions", StatusLevel::Warning);
                return Err(err);
            }
        };

        match self.transport.versions(&identity).await {
            Ok(response) if response.success => {
                self.state
                    .lock()
                    .history_loaded(response.versions, response.article_title)
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "version list rejected".to_owned());
                self.state.lock().history_load_failed();
                Err(self.report_failure("Version list", ClientError::Rejected(message.into())))
            }
            Err(err) => {
                self.state.lock().history_load_failed();
                Err(self.report_failure("Version list", err))
            }
        }
    }

    /// Select an entry in the open version browser.
    pub fn select_version(&self, id: u64) -> Result<(), ClientError> {
        self.state.lock().select_version(id)
    }

    /// Dismiss the version browser.
    pub fn close_history(&self) {
        self.state.lock().close_history();
    }

    /// Restore the selected version. `confirmed` is the user's answer to
    /// the destructive-overwrite prompt; declining is a silent no-op
    /// error, not a failure.
    pub async fn restore_selected(&self, confirmed: bool) -> Result<(), ClientError> {
        if !confirmed {
            return Err(ClientError::NotConfirmed);
        }
        let version_id = match self.state.lock().begin_restore() {
            Ok(version_id) => version_id,
            Err(err) => return Err(self.report_failure("Restore", err)),
        };

        let content = match self.transport.restore(version_id).await {
            Ok(response) if response.success => match response.data {
                Some(content) => content,
                None => {
                    self.state.lock().restore_failed();
                    return Err(self.report_failure(
                        "Restore",
                        ClientError::MalformedResponse("restore response carried no data".into()),
                    ));
                }
            },
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "restore rejected".to_owned());
                self.state.lock().restore_failed();
                return Err(self.report_failure("Restore", ClientError::Rejected(message.into())));
            }
            Err(err) => {
                self.state.lock().restore_failed();
                return Err(self.report_failure("Restore", err));
            }
        };

        self.state
            .lock()
            .apply_restore(content.title.clone(), content.body.clone());
        self.host.apply_restore(&content.title, &content.body);
        self.sink.report("Version restored", StatusLevel::Success);

        // Persist the restored content as a fresh version shortly after,
        // once the host has settled.
        let session = self.clone();
        let delay = self.config.post_restore_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = session.save(SaveKind::Manual).await {
                warn!(%err, "post-restore save failed");
            }
        });
        Ok(())
    }

    /// Fetch and render the server-side document summary. A document with
    /// no identity has no server state; no request is made.
    pub async fn load_status(&self) -> Result<Option<DocumentStatus>, ClientError> {
        let Some(identity) = self.identity() else {
            return Ok(None);
        };
        let response = self.transport.status(&identity).await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "status rejected".to_owned());
            return Err(ClientError::Rejected(message.into()));
        }
        let status = response.data.ok_or_else(|| {
            ClientError::MalformedResponse("status response carried no data".into())
        })?;
        self.sink.render_status(&status);
        Ok(Some(status))
    }

    /// Promote the draft to published.
    pub async fn publish(&self) -> Result<PublishData, ClientError> {
        let Some(identity) = self.identity() else {
            self.sink
                .report("Save the document before publishing", StatusLevel::Warning);
            return Err(ClientError::NoIdentity);
        };
        let data = match self.transport.publish(&identity).await {
            Ok(response) if response.success => response.data.ok_or_else(|| {
                ClientError::MalformedResponse("publish response carried no data".into())
            }),
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "publish rejected".to_owned());
                Err(ClientError::Rejected(message.into()))
            }
            Err(err) => Err(err),
        };
        match data {
            Ok(data) => {
                self.sink.report("Published", StatusLevel::Success);
                Ok(data)
            }
            Err(err) => Err(self.report_failure("Publish", err)),
        }
    }

    /// Report an operation failure at the level its class warrants and
    /// hand the error back for the caller to propagate.
    fn report_failure(&self, what: &str, err: ClientError) -> ClientError {
        let level = if err.is_refusal() {
            StatusLevel::Warning
        } else {
            StatusLevel::Error
        };
        self.sink.report(&format!("{what} failed: {err}"), level);
        err
    }
}
