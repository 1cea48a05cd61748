//! Autosave cadence.
//!
//! One background task per started scheduler: a standalone first attempt
//! after `initial_save_delay`, then one attempt per `autosave_interval`.
//! Attempt outcomes never stop the cadence; failures are logged and the
//! next tick retries. Stopping cancels future firings only, an in-flight
//! attempt runs to completion inside its select arm.

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use draftsync_core::gate::{SaveKind, SaveOutcome};

use crate::session::Session;
use crate::transport::Transport;

/// Drives periodic autosave attempts for one session.
pub struct Scheduler<T: Transport> {
    session: Session<T>,
    stop: Mutex<Option<watch::Sender<bool>>>,
}

impl<T: Transport> Scheduler<T> {
    #[must_use]
    pub fn new(session: Session<T>) -> Self {
        Self {
            session,
            stop: Mutex::new(None),
        }
    }

    /// Start the cadence with the session's configured timing. Starting
    /// while already started replaces the running task.
    pub fn start(&self) {
        let config = self.session.config();
        let interval = config.autosave_interval;
        let initial_delay = config.initial_save_delay;
        self.start_with(interval, initial_delay);
    }

    /// Start with explicit timing.
    pub fn start_with(&self, interval: std::time::Duration, initial_delay: std::time::Duration) {
        let (tx, mut rx) = watch::channel(false);
        // Dropping the previous sender ends the previous task's watch with
        // an error, which its loop treats as a stop.
        *self.stop.lock() = Some(tx);

        let session = self.session.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick fires immediately; the standalone
            // initial attempt replaces it.
            ticker.reset();

            let initial = tokio::time::sleep(initial_delay);
            tokio::pin!(initial);
            let mut initial_done = false;

            loop {
                tokio::select! {
                    () = &mut initial, if !initial_done => {
                        initial_done = true;
                        run_attempt(&session).await;
                        ticker.reset();
                    }
                    _ = ticker.tick() => {
                        run_attempt(&session).await;
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            debug!("autosave cadence stopped");
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Cancel future firings. Idempotent.
    pub fn stop(&self) {
        if let Some(tx) = self.stop.lock().take() {
            let _ = tx.send(true);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stop.lock().is_some()
    }
}

impl<T: Transport> Drop for Scheduler<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_attempt<T: Transport>(session: &Session<T>) {
    match session.save(SaveKind::Auto).await {
        Ok(SaveOutcome::Saved(receipt)) => {
            debug!(version = receipt.version, "autosave tick saved");
        }
        Ok(SaveOutcome::Skipped(reason)) => {
            debug!(?reason, "autosave tick skipped");
        }
        Err(err) => {
            warn!(%err, "autosave tick failed");
        }
    }
}
