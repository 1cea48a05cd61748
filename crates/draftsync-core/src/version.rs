//! Version numbering and identity assignment.

use tracing::warn;

use crate::document::DocumentId;
use crate::error::ClientError;
use crate::wire::SaveData;

/// Expected version before any save has succeeded.
pub const INITIAL_VERSION: u64 = 1;

/// Tracks the document identity and the next version number the server is
/// expected to assign.
///
/// `expected_next_version` is derived only from server responses (or the
/// initial value) and never decreases. Identity transitions exactly once
/// from `None` to a concrete value; a later response carrying a different
/// id is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionState {
    identity: Option<DocumentId>,
    expected_next_version: u64,
    save_count: u64,
}

/// What reconciling a save response established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Version the server stamped on this save.
    pub version: u64,
    /// Set when this response assigned the identity for the first time;
    /// the host's router should be notified.
    pub newly_identified: Option<DocumentId>,
}

impl VersionState {
    #[must_use]
    pub fn new(identity: Option<DocumentId>) -> Self {
        Self {
            identity,
            expected_next_version: INITIAL_VERSION,
            save_count: 0,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&DocumentId> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn expected_next_version(&self) -> u64 {
        self.expected_next_version
    }

    /// Successful saves reconciled so far in this session.
    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.save_count
    }

    /// Fold a successful save response into local state.
    ///
    /// A success payload without a usable version, or a first save without
    /// an identity, leaves the state untouched and reports a malformed
    /// response instead of fabricating numbers.
    pub fn reconcile(&mut self, data: &SaveData) -> Result<Reconciled, ClientError> {
        let version = data
            .version
            .ok_or_else(|| ClientError::MalformedResponse("save response carried no version".into()))?;

        let newly_identified = match (&self.identity, &data.article_id) {
            (None, Some(id)) => {
                self.identity = Some(id.clone());
                Some(id.clone())
            }
            (None, None) => {
                return Err(ClientError::MalformedResponse(
                    "first save response carried no article_id".into(),
                ));
            }
            (Some(local), Some(remote)) if local != remote => {
                warn!(local = %local, remote = %remote, "ignoring identity change from server");
                None
            }
            _ => None,
        };

        if version >= self.expected_next_version {
            self.expected_next_version = version + 1;
        } else {
            // Never decrease; a stale number from the server is logged
            // and the local expectation stands.
            warn!(
                version,
                expected = self.expected_next_version,
                "server returned stale version"
            );
        }
        self.save_count += 1;

        Ok(Reconciled {
            version,
            newly_identified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_data(id: Option<&str>, version: Option<u64>) -> SaveData {
        SaveData {
            article_id: id.map(DocumentId::new),
            version,
            ..SaveData::default()
        }
    }

    #[test]
    fn first_save_assigns_identity_and_bumps_version() {
        let mut state = VersionState::new(None);
        assert_eq!(state.expected_next_version(), 1);

        let reconciled = state.reconcile(&save_data(Some("7"), Some(1))).unwrap();
        assert_eq!(reconciled.version, 1);
        assert_eq!(reconciled.newly_identified, Some(DocumentId::new("7")));
        assert_eq!(state.identity(), Some(&DocumentId::new("7")));
        assert_eq!(state.expected_next_version(), 2);
        assert_eq!(state.save_count(), 1);
    }

    #[test]
    fn identity_assignment_is_single_shot() {
        let mut state = VersionState::new(None);
        state.reconcile(&save_data(Some("42"), Some(1))).unwrap();

        let reconciled = state.reconcile(&save_data(Some("43"), Some(2))).unwrap();
        assert_eq!(reconciled.newly_identified, None);
        assert_eq!(state.identity(), Some(&DocumentId::new("42")));
    }

    #[test]
    fn expected_version_is_strictly_increasing() {
        let mut state = VersionState::new(Some(DocumentId::new("7")));
        for version in 1..=4 {
            state.reconcile(&save_data(None, Some(version))).unwrap();
            assert_eq!(state.expected_next_version(), version + 1);
        }

        // A stale version from the server never lowers the expectation.
        state.reconcile(&save_data(None, Some(2))).unwrap();
        assert_eq!(state.expected_next_version(), 5);
    }

    #[test]
    fn missing_version_leaves_state_unchanged() {
        let mut state = VersionState::new(None);
        let err = state.reconcile(&save_data(Some("7"), None)).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(state.identity(), None);
        assert_eq!(state.expected_next_version(), 1);
        assert_eq!(state.save_count(), 0);
    }

    #[test]
    fn missing_identity_on_first_save_is_malformed() {
        let mut state = VersionState::new(None);
        let err = state.reconcile(&save_data(None, Some(1))).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
        assert_eq!(state.expected_next_version(), 1);
    }
}
