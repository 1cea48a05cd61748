//! Version history browser state machine.
//!
//! `Closed -> Loading -> Listed -> (selected) -> Restoring -> Closed`.
//! Selection lives inside `Listed`; picking a different entry re-selects
//! with no intermediate state. A failed restore drops back to `Listed`
//! with the selection kept so the user can retry or pick another version.

use std::mem;

use crate::error::ClientError;
use crate::wire::VersionEntry;

/// Most entries ever rendered; the server caps its list the same way.
pub const MAX_HISTORY_ENTRIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryView {
    #[default]
    Closed,
    /// Version list fetch in flight.
    Loading,
    /// Entries rendered most-recent-first.
    Listed {
        entries: Vec<VersionEntry>,
        article_title: Option<String>,
        selected: Option<u64>,
    },
    /// Restore request in flight for the selected entry.
    Restoring {
        entries: Vec<VersionEntry>,
        article_title: Option<String>,
        selected: u64,
    },
}

impl HistoryView {
    /// Begin loading. Refused without an identity ("save first") and when
    /// the view is already open.
    pub fn open(&mut self, has_identity: bool) -> Result<(), ClientError> {
        if !has_identity {
            return Err(ClientError::NoIdentity);
        }
        match self {
            Self::Closed => {
                *self = Self::Loading;
                Ok(())
            }
            _ => Err(ClientError::HistoryState("already open")),
        }
    }

    /// Fetch succeeded; render at most [`MAX_HISTORY_ENTRIES`] entries.
    pub fn loaded(
        &mut self,
        mut entries: Vec<VersionEntry>,
        article_title: Option<String>,
    ) -> Result<(), ClientError> {
        if !matches!(self, Self::Loading) {
            return Err(ClientError::HistoryState("not loading"));
        }
        entries.truncate(MAX_HISTORY_ENTRIES);
        *self = Self::Listed {
            entries,
            article_title,
            selected: None,
        };
        Ok(())
    }

    /// Fetch failed; the view closes and the caller surfaces the error.
    pub fn load_failed(&mut self) {
        *self = Self::Closed;
    }

    /// Select an entry by id; re-selecting a different entry is allowed.
    pub fn select(&mut self, id: u64) -> Result<(), ClientError> {
        let Self::Listed {
            entries, selected, ..
        } = self
        else {
            return Err(ClientError::HistoryState("nothing listed"));
        };
        if !entries.iter().any(|entry| entry.id == id) {
            return Err(ClientError::UnknownVersion(id));
        }
        *selected = Some(id);
        Ok(())
    }

    /// Move to `Restoring`; returns the id to send to the server.
    pub fn begin_restore(&mut self) -> Result<u64, ClientError> {
        match mem::take(self) {
            Self::Listed {
                entries,
                article_title,
                selected: Some(selected),
            } => {
                *self = Self::Restoring {
                    entries,
                    article_title,
                    selected,
                };
                Ok(selected)
            }
            Self::Listed {
                entries,
                article_title,
                selected: None,
            } => {
                *self = Self::Listed {
                    entries,
                    article_title,
                    selected: None,
                };
                Err(ClientError::NoSelection)
            }
            other => {
                *self = other;
                Err(ClientError::HistoryState("nothing listed"))
            }
        }
    }

    /// Restore succeeded; the view closes.
    pub fn restore_succeeded(&mut self) {
        *self = Self::Closed;
    }

    /// Restore failed; stay open at the selection so the user can retry.
    pub fn restore_failed(&mut self) {
        if let Self::Restoring {
            entries,
            article_title,
            selected,
        } = mem::take(self)
        {
            *self = Self::Listed {
                entries,
                article_title,
                selected: Some(selected),
            };
        }
    }

    /// User dismissed the view.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    #[must_use]
    pub fn entries(&self) -> &[VersionEntry] {
        match self {
            Self::Listed { entries, .. } | Self::Restoring { entries, .. } => entries,
            _ => &[],
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<u64> {
        match self {
            Self::Listed { selected, .. } => *selected,
            Self::Restoring { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// The entry marked "current" in the rendered list: the most recent.
    #[must_use]
    pub fn current_entry(&self) -> Option<&VersionEntry> {
        self.entries().first()
    }

    /// Restore is enabled only once a selection exists.
    #[must_use]
    pub fn can_restore(&self) -> bool {
        matches!(self, Self::Listed { selected: Some(_), .. })
    }
}
