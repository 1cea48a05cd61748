//! Editable document model and change detection.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

/// Server-assigned durable key for a document.
///
/// Absent until the first successful save; once assigned it never changes
/// for the lifetime of the session. The server may emit the id as a JSON
/// number or a string; both normalize to the decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(SmolStr);

impl DocumentId {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

struct DocumentIdVisitor;

impl Visitor<'_> for DocumentIdVisitor {
    type Value = DocumentId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a document id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(DocumentId::new(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(DocumentId(SmolStr::new(value.to_string())))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(DocumentId(SmolStr::new(value.to_string())))
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentIdVisitor)
    }
}

/// The document as the session currently sees it.
///
/// The host page owns the actual editor widgets; this is the session's
/// view of their content, refreshed before every save attempt and
/// overwritten by a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableDocument {
    pub identity: Option<DocumentId>,
    pub title: String,
    pub body: String,
}

impl EditableDocument {
    #[must_use]
    pub fn new(identity: Option<DocumentId>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            identity,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Exact concatenation of title and body, the unit of change detection.
    #[must_use]
    pub fn combined_content(&self) -> String {
        format!("{}{}", self.title, self.body)
    }

    /// True when both title and body are empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

/// The last content the client knows to be persisted.
///
/// After a successful save this holds the content that was *sent*, not the
/// content currently in the editor, which may have changed during the
/// round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSnapshot {
    combined_content: String,
    title: String,
}

impl SaveSnapshot {
    #[must_use]
    pub fn capture(title: &str, body: &str) -> Self {
        Self {
            combined_content: format!("{title}{body}"),
            title: title.to_owned(),
        }
    }

    #[must_use]
    pub fn combined_content(&self) -> &str {
        &self.combined_content
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Whether `current` differs from the persisted snapshot.
///
/// An emptied document never reports changes, so a save that races the
/// first keystroke cannot wipe server content. Exact comparison, no
/// whitespace normalization.
#[must_use]
pub fn has_changes(current: &EditableDocument, snapshot: &SaveSnapshot) -> bool {
    if current.is_blank() {
        return false;
    }
    current.combined_content() != snapshot.combined_content
}
