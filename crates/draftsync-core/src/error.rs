//! Client error taxonomy.
//!
//! Nothing here is fatal to the process: every error is scoped to a single
//! attempt and the autosave cadence keeps ticking. Skips are not errors at
//! all; see [`crate::gate::SkipReason`].

use smol_str::SmolStr;
use thiserror::Error;

/// Errors produced by save, history, restore and status operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport-level failure: connection, timeout, unparseable body.
    #[error("request failed: {0}")]
    RequestFailed(SmolStr),

    /// The server answered with `success: false`.
    #[error("server rejected request: {0}")]
    Rejected(SmolStr),

    /// The server reported success but the payload is unusable; local
    /// state is left unchanged rather than fabricated.
    #[error("malformed server response: {0}")]
    MalformedResponse(SmolStr),

    /// The operation needs a saved document and none exists yet.
    #[error("document has not been saved yet")]
    NoIdentity,

    /// Restore was requested without a selected version.
    #[error("no version selected")]
    NoSelection,

    /// Restore was requested without explicit confirmation.
    #[error("restore not confirmed")]
    NotConfirmed,

    /// The selected version id is not in the rendered list.
    #[error("unknown version {0}")]
    UnknownVersion(u64),

    /// The history view is not in a state that permits the operation.
    #[error("history view is {0}")]
    HistoryState(&'static str),
}

impl ClientError {
    /// Refusals are invalid preconditions, surfaced at warning level with
    /// no automatic retry; everything else is an error-level failure.
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::NoIdentity
                | Self::NoSelection
                | Self::NotConfirmed
                | Self::UnknownVersion(_)
                | Self::HistoryState(_)
        )
    }
}
