//! Status summary and publish round trips.

mod common;

use common::fixture;
use draftsync_core::document::DocumentId;
use draftsync_core::error::ClientError;
use draftsync_core::status::StatusLevel;
use draftsync_core::wire::{
    DocumentStatus, LatestDraft, PublishData, PublishResponse, StatusResponse,
};

#[tokio::test]
async fn unsaved_document_has_only_local_status() {
    let fix = fixture(None, "Hello", "World");
    let status = fix.session.load_status().await.unwrap();
    assert_eq!(status, None);
    assert!(fix.transport.status_requests().is_empty());
    assert!(fix.sink.rendered().is_empty());
}

#[tokio::test]
async fn status_poll_renders_the_summary() {
    let fix = fixture(Some("7"), "Hello", "World");
    fix.transport.enqueue_status(Ok(StatusResponse {
        success: true,
        message: None,
        data: Some(DocumentStatus {
            article_id: Some(DocumentId::new("7")),
            title: Some("Hello".to_owned()),
            status: Some("d".to_owned()),
            is_draft: Some(true),
            draft_count: Some(3),
            last_modify_time: Some("2026-08-30 10:00:00".to_owned()),
            latest_draft: Some(LatestDraft {
                id: Some(12),
                title: Some("Hello".to_owned()),
                version: 3,
                save_type: None,
                saved_at: None,
                human_time: Some("2 minutes ago".to_owned()),
            }),
        }),
    }));

    let status = fix.session.load_status().await.unwrap().unwrap();
    assert_eq!(status.draft_count, Some(3));
    assert_eq!(fix.transport.status_requests(), vec![DocumentId::new("7")]);

    let rendered = fix.sink.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].latest_draft.as_ref().unwrap().version, 3);
}

#[tokio::test]
async fn status_with_no_payload_is_malformed() {
    let fix = fixture(Some("7"), "Hello", "World");
    fix.transport.enqueue_status(Ok(StatusResponse {
        success: true,
        message: None,
        data: None,
    }));
    let err = fix.session.load_status().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert!(fix.sink.rendered().is_empty());
}

#[tokio::test]
async fn publish_requires_identity() {
    let fix = fixture(None, "Hello", "World");
    let err = fix.session.publish().await.unwrap_err();
    assert_eq!(err, ClientError::NoIdentity);
    assert!(fix.transport.publish_requests().is_empty());
    let (_, level) = fix.sink.last_report().unwrap();
    assert_eq!(level, StatusLevel::Warning);
}

#[tokio::test]
async fn publish_promotes_the_draft() {
    let fix = fixture(Some("7"), "Hello", "World");
    fix.transport.enqueue_publish(Ok(PublishResponse {
        success: true,
        message: Some("published".to_owned()),
        data: Some(PublishData {
            article_id: Some(DocumentId::new("7")),
            title: Some("Hello".to_owned()),
            status: Some("p".to_owned()),
            pub_time: Some("2026-08-30 10:00:00".to_owned()),
        }),
    }));

    let data = fix.session.publish().await.unwrap();
    assert_eq!(data.status.as_deref(), Some("p"));
    assert_eq!(fix.transport.publish_requests(), vec![DocumentId::new("7")]);
    let (message, level) = fix.sink.last_report().unwrap();
    assert_eq!(level, StatusLevel::Success);
    assert!(message.contains("Published"), "unexpected message: {message}");
}

#[tokio::test]
async fn rejected_publish_is_reported() {
    let fix = fixture(Some("7"), "Hello", "World");
    fix.transport.enqueue_publish(Ok(PublishResponse {
        success: false,
        message: Some("draft is empty".to_owned()),
        data: None,
    }));
    let err = fix.session.publish().await.unwrap_err();
    assert_eq!(err, ClientError::Rejected("draft is empty".into()));
    let (message, level) = fix.sink.last_report().unwrap();
    assert_eq!(level, StatusLevel::Error);
    assert!(message.contains("draft is empty"), "unexpected: {message}");
}
