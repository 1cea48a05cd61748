//! `draftsync-client` - tokio session for the draftsync state machine.
//!
//! Wires the pure state machine from `draftsync-core` to a [`Transport`],
//! an [`EditorHost`] binding supplied by the page, and an autosave
//! [`Scheduler`]. Single logical thread of control: the session state is
//! guarded by a mutex that is never held across a suspension point, and
//! the save gate serializes round trips.

pub mod config;
pub mod host;
pub mod http;
pub mod scheduler;
pub mod session;
pub mod transport;

pub use config::SessionConfig;
pub use host::{EditorHost, MemoryHost};
pub use http::HttpTransport;
pub use scheduler::Scheduler;
pub use session::Session;
pub use transport::{MockTransport, Transport};

pub use draftsync_core as core;
