//! Single-flight save gate.
//!
//! At most one save attempt is live per document. A second attempt while
//! one is outstanding is rejected, not queued; the caller simply tries
//! again on the next tick. This is the sole mechanism preventing
//! version-number races: the server never sees overlapping requests it
//! cannot order.

use serde::{Deserialize, Serialize};

use crate::document::DocumentId;

/// Save trigger tag. Affects display only, never persistence semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Auto,
    Manual,
}

impl SaveKind {
    /// User-facing label for indicator messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "Autosave",
            Self::Manual => "Manual save",
        }
    }
}

/// Why a save attempt was a no-op. A skip is never surfaced as an
/// error, and skip-due-to-no-change stays silent in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Title and body are both empty or whitespace-only.
    Empty,
    /// Content matches the last persisted snapshot.
    Unchanged,
    /// Another attempt is in flight; equivalent to "already saving,
    /// try again shortly".
    Busy,
}

/// What a completed save attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SaveReceipt),
    Skipped(SkipReason),
}

/// Facts a successful save established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub kind: SaveKind,
    pub identity: DocumentId,
    pub version: u64,
    pub human_time: Option<String>,
    pub is_draft: bool,
}

/// The in-flight lock itself.
///
/// Callers must release on every exit path; the client layer wraps this in
/// an RAII guard so a failed round trip cannot leave the gate stuck.
#[derive(Debug, Default)]
pub struct SaveGate {
    live: bool,
}

impl SaveGate {
    /// Acquire the gate. Returns `false` when an attempt is already live.
    pub fn try_acquire(&mut self) -> bool {
        if self.live {
            return false;
        }
        self.live = true;
        true
    }

    pub fn release(&mut self) {
        self.live = false;
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_single_flight() {
        let mut gate = SaveGate::default();
        assert!(gate.try_acquire());
        assert!(gate.is_live());
        assert!(!gate.try_acquire());
        gate.release();
        assert!(gate.try_acquire());
    }

    #[test]
    fn save_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SaveKind::Auto).unwrap(), "\"auto\"");
        assert_eq!(
            serde_json::to_string(&SaveKind::Manual).unwrap(),
            "\"manual\""
        );
    }
}
