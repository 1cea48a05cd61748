//! Transport seam between the session and the autosave API.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use draftsync_core::document::DocumentId;
use draftsync_core::error::ClientError;
use draftsync_core::wire::{
    PublishResponse, RestoreResponse, SaveRequest, SaveResponse, StatusResponse, VersionsResponse,
};
use parking_lot::Mutex;

/// Network interface for the autosave API.
///
/// Each method is one suspension point: a non-blocking round trip that
/// yields until the server answers. [`crate::HttpTransport`] speaks the
/// real protocol; [`MockTransport`] is a deterministic double for tests
/// and simulations.
pub trait Transport: Send + Sync + 'static {
    /// `POST <save_url>[<identity>/]`.
    fn save(
        &self,
        identity: Option<&DocumentId>,
        request: &SaveRequest,
    ) -> impl Future<Output = Result<SaveResponse, ClientError>> + Send;

    /// `GET <versions_url><identity>/`.
    fn versions(
        &self,
        identity: &DocumentId,
    ) -> impl Future<Output = Result<VersionsResponse, ClientError>> + Send;

    /// `POST <restore_url><version_id>/`.
    fn restore(
        &self,
        version_id: u64,
    ) -> impl Future<Output = Result<RestoreResponse, ClientError>> + Send;

    /// `GET <status_url><identity>/`.
    fn status(
        &self,
        identity: &DocumentId,
    ) -> impl Future<Output = Result<StatusResponse, ClientError>> + Send;

    /// `POST <publish_url><identity>/`.
    fn publish(
        &self,
        identity: &DocumentId,
    ) -> impl Future<Output = Result<PublishResponse, ClientError>> + Send;
}

#[derive(Debug, Default)]
struct MockState {
    save_responses: VecDeque<Result<SaveResponse, ClientError>>,
    versions_responses: VecDeque<Result<VersionsResponse, ClientError>>,
    restore_responses: VecDeque<Result<RestoreResponse, ClientError>>,
    status_responses: VecDeque<Result<StatusResponse, ClientError>>,
    publish_responses: VecDeque<Result<PublishResponse, ClientError>>,
    save_requests: Vec<(Option<DocumentId>, SaveRequest)>,
    versions_requests: Vec<DocumentId>,
    restore_requests: Vec<u64>,
    status_requests: Vec<DocumentId>,
    publish_requests: Vec<DocumentId>,
    in_flight: u32,
    max_in_flight: u32,
    latency: Option<Duration>,
}

/// Deterministic transport for tests and simulations.
///
/// Responses are scripted per operation and consumed in order; a request
/// with nothing scripted fails. Every request is recorded, and the peak
/// number of concurrently outstanding requests is tracked so tests can
/// assert the single-flight guarantee.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every round trip take `latency` of (tokio) time, so tests can
    /// overlap attempts under a paused clock.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().latency = Some(latency);
        self
    }

    pub fn enqueue_save(&self, response: Result<SaveResponse, ClientError>) {
        self.state.lock().save_responses.push_back(response);
    }

    pub fn enqueue_versions(&self, response: Result<VersionsResponse, ClientError>) {
        self.state.lock().versions_responses.push_back(response);
    }

    pub fn enqueue_restore(&self, response: Result<RestoreResponse, ClientError>) {
        self.state.lock().restore_responses.push_back(response);
    }

    pub fn enqueue_status(&self, response: Result<StatusResponse, ClientError>) {
        self.state.lock().status_responses.push_back(response);
    }

    pub fn enqueue_publish(&self, response: Result<PublishResponse, ClientError>) {
        self.state.lock().publish_responses.push_back(response);
    }

    /// Save requests seen so far, in order.
    #[must_use]
    pub fn save_requests(&self) -> Vec<(Option<DocumentId>, SaveRequest)> {
        self.state.lock().save_requests.clone()
    }

    #[must_use]
    pub fn versions_requests(&self) -> Vec<DocumentId> {
        self.state.lock().versions_requests.clone()
    }

    #[must_use]
    pub fn restore_requests(&self) -> Vec<u64> {
        self.state.lock().restore_requests.clone()
    }

    #[must_use]
    pub fn status_requests(&self) -> Vec<DocumentId> {
        self.state.lock().status_requests.clone()
    }

    #[must_use]
    pub fn publish_requests(&self) -> Vec<DocumentId> {
        self.state.lock().publish_requests.clone()
    }

    /// Peak number of requests outstanding at the same time.
    #[must_use]
    pub fn max_in_flight(&self) -> u32 {
        self.state.lock().max_in_flight
    }

    async fn round_trip<R>(
        &self,
        take: impl FnOnce(&mut MockState) -> Result<R, ClientError>,
    ) -> Result<R, ClientError> {
        let (latency, result) = {
            let mut state = self.state.lock();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            (state.latency, take(&mut state))
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.state.lock().in_flight -= 1;
        result
    }
}

fn unscripted(operation: &str) -> ClientError {
    ClientError::RequestFailed(format!("mock transport: no scripted {operation} response").into())
}

impl Transport for MockTransport {
    async fn save(
        &self,
        identity: Option<&DocumentId>,
        request: &SaveRequest,
    ) -> Result<SaveResponse, ClientError> {
        let identity = identity.cloned();
        let request = request.clone();
        self.round_trip(move |state| {
            state.save_requests.push((identity, request));
            state
                .save_responses
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("save")))
        })
        .await
    }

    async fn versions(&self, identity: &DocumentId) -> Result<VersionsResponse, ClientError> {
        let identity = identity.clone();
        self.round_trip(move |state| {
            state.versions_requests.push(identity);
            state
                .versions_responses
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("versions")))
        })
        .await
    }

    async fn restore(&self, version_id: u64) -> Result<RestoreResponse, ClientError> {
        self.round_trip(move |state| {
            state.restore_requests.push(version_id);
            state
                .restore_responses
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("restore")))
        })
        .await
    }

    async fn status(&self, identity: &DocumentId) -> Result<StatusResponse, ClientError> {
        let identity = identity.clone();
        self.round_trip(move |state| {
            state.status_requests.push(identity);
            state
                .status_responses
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("status")))
        })
        .await
    }

    async fn publish(&self, identity: &DocumentId) -> Result<PublishResponse, ClientError> {
        let identity = identity.clone();
        self.round_trip(move |state| {
            state.publish_requests.push(identity);
            state
                .publish_responses
                .pop_front()
                .unwrap_or_else(|| Err(unscripted("publish")))
        })
        .await
    }
}
