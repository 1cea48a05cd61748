//! Session configuration.

use std::time::Duration;

/// Endpoints and timing for one editing session.
///
/// Defaults: a 30 second autosave cadence
/// with the first attempt 5 seconds after startup, and the post-restore
/// save half a second after a restore lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// `POST` target for saves; the identity is appended for existing
    /// documents.
    pub save_url: String,
    /// `GET` target for the version list; the identity is appended.
    pub versions_url: String,
    /// `POST` target for restores; the version id is appended.
    pub restore_url: String,
    /// `GET` target for the status poll; the identity is appended.
    pub status_url: String,
    /// `POST` target for publishing; the identity is appended.
    pub publish_url: String,
    /// Repeating autosave cadence.
    pub autosave_interval: Duration,
    /// Delay before the standalone first attempt, decoupled from the
    /// cadence so the very first save happens sooner than one interval.
    pub initial_save_delay: Duration,
    /// Delay before the manual save that follows a successful restore.
    pub post_restore_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_url: "/api/autosave/draft/".to_owned(),
            versions_url: "/api/autosave/versions/".to_owned(),
            restore_url: "/api/autosave/restore/".to_owned(),
            status_url: "/api/autosave/status/".to_owned(),
            publish_url: "/api/autosave/publish/".to_owned(),
            autosave_interval: Duration::from_secs(30),
            initial_save_delay: Duration::from_secs(5),
            post_restore_delay: Duration::from_millis(500),
        }
    }
}

impl SessionConfig {
    /// Rebase all endpoints onto an origin, e.g. `https://blog.example`.
    #[must_use]
    pub fn with_origin(mut self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        for url in [
            &mut self.save_url,
            &mut self.versions_url,
            &mut self.restore_url,
            &mut self.status_url,
            &mut self.publish_url,
        ] {
            *url = format!("{origin}{url}");
        }
        self
    }
}
