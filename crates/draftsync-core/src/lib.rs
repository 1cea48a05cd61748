//! `draftsync-core` - autosave and version-tracking state machine.
//!
//! Pure, deterministic building blocks for keeping an editable document
//! (title + body) synchronized with a server-held version history: change
//! detection, single-flight save gating, monotonic version tracking, lazy
//! identity assignment, and the version history browser state machine.
//!
//! Nothing here performs I/O. The sibling `draftsync-client` crate drives
//! these types against a transport and a timer.

pub mod document;
pub mod error;
pub mod gate;
pub mod history;
pub mod session;
pub mod status;
pub mod version;
pub mod wire;

pub use document::{has_changes, DocumentId, EditableDocument, SaveSnapshot};
pub use error::ClientError;
pub use gate::{SaveGate, SaveKind, SaveOutcome, SaveReceipt, SkipReason};
pub use history::{HistoryView, MAX_HISTORY_ENTRIES};
pub use session::{AttemptDecision, PendingSave, SessionState};
pub use status::{NullSink, RecordingSink, StatusLevel, StatusSink};
pub use version::{Reconciled, VersionState, INITIAL_VERSION};
