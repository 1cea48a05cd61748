//! Shared fixture for the session integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use draftsync_client::{MemoryHost, MockTransport, Session, SessionConfig};
use draftsync_core::document::DocumentId;
use draftsync_core::error::ClientError;
use draftsync_core::status::RecordingSink;
use draftsync_core::wire::{
    RestoredContent, RestoreResponse, SaveData, SaveResponse, VersionEntry, VersionsResponse,
};
use draftsync_core::SaveKind;

pub struct Fixture {
    pub session: Session<MockTransport>,
    pub transport: MockTransport,
    pub host: Arc<MemoryHost>,
    pub sink: Arc<RecordingSink>,
}

pub fn fixture(identity: Option<&str>, title: &str, body: &str) -> Fixture {
    build(MockTransport::new(), identity, title, body)
}

pub fn build(transport: MockTransport, identity: Option<&str>, title: &str, body: &str) -> Fixture {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let host = Arc::new(MemoryHost::new(title, body));
    let sink = Arc::new(RecordingSink::new());
    let session = Session::new(
        transport.clone(),
        host.clone(),
        sink.clone(),
        SessionConfig::default(),
        identity.map(DocumentId::new),
    );
    Fixture {
        session,
        transport,
        host,
        sink,
    }
}

pub fn ok_save(id: &str, version: u64, human_time: &str) -> Result<SaveResponse, ClientError> {
    Ok(SaveResponse {
        success: true,
        message: Some("saved".to_owned()),
        data: Some(SaveData {
            article_id: Some(DocumentId::new(id)),
            version: Some(version),
            human_time: Some(human_time.to_owned()),
            is_draft: Some(true),
            ..SaveData::default()
        }),
    })
}

pub fn rejected_save(message: &str) -> Result<SaveResponse, ClientError> {
    Ok(SaveResponse {
        success: false,
        message: Some(message.to_owned()),
        data: None,
    })
}

pub fn version_entry(id: u64, version: u64, title: &str) -> VersionEntry {
    VersionEntry {
        id,
        title: title.to_owned(),
        body_preview: String::new(),
        version,
        save_type: SaveKind::Auto,
        status_display: Some("Draft".to_owned()),
        human_time: None,
        saved_at: None,
    }
}

pub fn ok_versions(entries: Vec<VersionEntry>) -> Result<VersionsResponse, ClientError> {
    Ok(VersionsResponse {
        success: true,
        message: None,
        versions: entries,
        article_title: Some("Hello".to_owned()),
    })
}

pub fn ok_restore(title: &str, body: &str, version: u64) -> Result<RestoreResponse, ClientError> {
    Ok(RestoreResponse {
        success: true,
        message: None,
        data: Some(RestoredContent {
            title: title.to_owned(),
            body: body.to_owned(),
            version: Some(version),
            status: Some("d".to_owned()),
        }),
    })
}
