//! JSON wire types for the autosave API.
//!
//! Field names mirror the server contract and must not be renamed.
//! Responses tolerate missing optional fields and ignore unknown ones.

use serde::{Deserialize, Serialize};

use crate::document::DocumentId;
use crate::gate::SaveKind;

/// Body of `POST <save_url>[<identity>/]`.
///
/// Sidecar fields are included only when the host form exposes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub title: String,
    pub body: String,
    pub save_type: SaveKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_toc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<SaveData>,
}

/// Payload of a successful save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub article_id: Option<DocumentId>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub human_time: Option<String>,
    #[serde(default)]
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub save_type: Option<SaveKind>,
    #[serde(default)]
    pub draft_id: Option<u64>,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
    #[serde(default)]
    pub article_title: Option<String>,
}

/// One row of the version history list, most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionEntry {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body_preview: String,
    pub version: u64,
    pub save_type: SaveKind,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub human_time: Option<String>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RestoredContent>,
}

/// Content of the version the server restored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoredContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<DocumentStatus>,
}

/// Canonical server-side state of the document, rendered into the
/// persistent on-page summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentStatus {
    #[serde(default)]
    pub article_id: Option<DocumentId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub draft_count: Option<u64>,
    #[serde(default)]
    pub last_modify_time: Option<String>,
    #[serde(default)]
    pub latest_draft: Option<LatestDraft>,
}

/// Summary of the most recent persisted version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LatestDraft {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    pub version: u64,
    #[serde(default)]
    pub save_type: Option<SaveKind>,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub human_time: Option<String>,
}

impl DocumentStatus {
    /// Build the summary a fresh save round trip implies, so the host can
    /// render it without a separate status poll.
    #[must_use]
    pub fn from_save(identity: DocumentId, kind: SaveKind, data: &SaveData) -> Self {
        Self {
            article_id: Some(identity),
            title: data.title.clone(),
            status: None,
            is_draft: data.is_draft,
            draft_count: None,
            last_modify_time: None,
            latest_draft: data.version.map(|version| LatestDraft {
                id: data.draft_id,
                title: data.title.clone(),
                version,
                save_type: data.save_type.or(Some(kind)),
                saved_at: data.saved_at.clone(),
                human_time: data.human_time.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PublishData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishData {
    #[serde(default)]
    pub article_id: Option<DocumentId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pub_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_omits_absent_sidecar_fields() {
        let request = SaveRequest {
            title: "Hello".into(),
            body: "World".into(),
            save_type: SaveKind::Auto,
            category_id: None,
            show_toc: None,
            article_order: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Hello",
                "body": "World",
                "save_type": "auto",
            })
        );
    }

    #[test]
    fn save_request_includes_present_sidecar_fields() {
        let request = SaveRequest {
            title: "Hello".into(),
            body: "World".into(),
            save_type: SaveKind::Manual,
            category_id: Some("3".into()),
            show_toc: Some(true),
            article_order: Some(7),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["save_type"], "manual");
        assert_eq!(json["category_id"], "3");
        assert_eq!(json["show_toc"], true);
        assert_eq!(json["article_order"], 7);
    }

    #[test]
    fn save_response_tolerates_numeric_article_id_and_extras() {
        let response: SaveResponse = serde_json::from_str(
            r#"{
                "success": true,
                "message": "saved",
                "data": {
                    "article_id": 42,
                    "draft_id": 9,
                    "version": 3,
                    "saved_at": "2024-05-01 10:00:00",
                    "human_time": "just now",
                    "save_type": "auto",
                    "is_draft": true,
                    "title": "Hello",
                    "unknown_field": [1, 2, 3]
                }
            }"#,
        )
        .unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.article_id, Some(DocumentId::new("42")));
        assert_eq!(data.version, Some(3));
        assert_eq!(data.save_type, Some(SaveKind::Auto));
    }

    #[test]
    fn versions_response_parses_entries() {
        let response: VersionsResponse = serde_json::from_str(
            r#"{
                "success": true,
                "article_title": "Hello",
                "versions": [
                    {"id": 5, "title": "Hello", "body_preview": "World...",
                     "version": 2, "save_type": "manual",
                     "status_display": "Draft",
                     "human_time": "2 minutes ago",
                     "saved_at": "2024-05-01 10:00:00"},
                    {"id": 4, "title": "Hello", "version": 1, "save_type": "auto"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(response.versions.len(), 2);
        assert_eq!(response.versions[0].version, 2);
        assert_eq!(response.versions[1].body_preview, "");
    }

    #[test]
    fn status_from_save_carries_version_summary() {
        let data = SaveData {
            article_id: Some(DocumentId::new("7")),
            version: Some(1),
            human_time: Some("just now".into()),
            is_draft: Some(true),
            ..SaveData::default()
        };
        let status = DocumentStatus::from_save(DocumentId::new("7"), SaveKind::Auto, &data);
        assert_eq!(status.article_id, Some(DocumentId::new("7")));
        let latest = status.latest_draft.unwrap();
        assert_eq!(latest.version, 1);
        assert_eq!(latest.save_type, Some(SaveKind::Auto));
    }
}
