//! Status reporting seam.
//!
//! The session never touches the page; the host supplies a sink. Transient
//! indicator messages follow latest-call-wins on the host side; the
//! persistent summary render must be idempotent.

use parking_lot::Mutex;

use crate::wire::DocumentStatus;

/// Severity of a transient indicator message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Presentation sink supplied by the host.
pub trait StatusSink: Send + Sync {
    /// Show a transient message; a later call supersedes any pending one.
    fn report(&self, message: &str, level: StatusLevel);

    /// Update the persistent document summary (state, last save time,
    /// version, history link). Must be idempotent. Hosts without a
    /// summary area can keep the default no-op.
    fn render_status(&self, status: &DocumentStatus) {
        let _ = status;
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn report(&self, _message: &str, _level: StatusLevel) {}
}

/// Sink that records every call, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, StatusLevel)>>,
    rendered: Mutex<Vec<DocumentStatus>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<(String, StatusLevel)> {
        self.reports.lock().clone()
    }

    /// The message currently shown, per latest-call-wins.
    #[must_use]
    pub fn last_report(&self) -> Option<(String, StatusLevel)> {
        self.reports.lock().last().cloned()
    }

    #[must_use]
    pub fn rendered(&self) -> Vec<DocumentStatus> {
        self.rendered.lock().clone()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
        self.rendered.lock().clear();
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, message: &str, level: StatusLevel) {
        self.reports.lock().push((message.to_owned(), level));
    }

    fn render_status(&self, status: &DocumentStatus) {
        self.rendered.lock().push(status.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_latest_report() {
        let sink = RecordingSink::new();
        sink.report("saving", StatusLevel::Info);
        sink.report("saved", StatusLevel::Success);
        assert_eq!(
            sink.last_report(),
            Some(("saved".to_owned(), StatusLevel::Success))
        );
        assert_eq!(sink.reports().len(), 2);
    }

    #[test]
    fn rendering_the_same_status_twice_is_observably_identical() {
        let sink = RecordingSink::new();
        let status = DocumentStatus::default();
        sink.render_status(&status);
        sink.render_status(&status);
        let rendered = sink.rendered();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0], rendered[1]);
    }
}
