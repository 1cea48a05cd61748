//! HTTP transport over ureq.
//!
//! ureq is a blocking client, so each round trip runs on the tokio
//! blocking pool; the session only ever sees a suspension point. Every
//! POST carries the CSRF token the host sourced from its cookie or meta
//! tag.

use std::time::Duration;

use draftsync_core::document::DocumentId;
use draftsync_core::error::ClientError;
use draftsync_core::wire::{
    PublishResponse, RestoreResponse, SaveRequest, SaveResponse, StatusResponse, VersionsResponse,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SessionConfig;
use crate::transport::Transport;

const CSRF_HEADER: &str = "X-CSRFToken";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Transport speaking the autosave JSON protocol.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    config: SessionConfig,
    csrf_token: Option<String>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(config: SessionConfig, csrf_token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            config,
            csrf_token,
        }
    }

    fn post_json<T>(&self, url: String, body: Option<serde_json::Value>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let mut request = self.agent.post(&url);
        if let Some(token) = self.csrf_token.as_deref() {
            request = request.set(CSRF_HEADER, token);
        }
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        read_response(result)
    }

    fn get_json<T>(&self, url: String) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "GET");
        read_response(self.agent.get(&url).call())
    }
}

/// Parse the body on success and on HTTP error statuses alike: the server
/// answers failures with `{ success: false, message }` bodies, which the
/// session maps to rejections rather than transport errors.
fn read_response<T>(result: Result<ureq::Response, ureq::Error>) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            debug!(code, "non-success status");
            response
        }
        Err(err) => return Err(ClientError::RequestFailed(err.to_string().into())),
    };
    response
        .into_json()
        .map_err(|err| ClientError::RequestFailed(format!("invalid response body: {err}").into()))
}

async fn on_blocking_pool<T, F>(operation: F) -> Result<T, ClientError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|err| ClientError::RequestFailed(format!("request task failed: {err}").into()))?
}

impl Transport for HttpTransport {
    async fn save(
        &self,
        identity: Option<&DocumentId>,
        request: &SaveRequest,
    ) -> Result<SaveResponse, ClientError> {
        let url = match identity {
            Some(identity) => format!("{}{identity}/", self.config.save_url),
            None => self.config.save_url.clone(),
        };
        let body = serde_json::to_value(request)
            .map_err(|err| ClientError::RequestFailed(format!("encode failed: {err}").into()))?;
        let transport = self.clone();
        on_blocking_pool(move || transport.post_json(url, Some(body))).await
    }

    async fn versions(&self, identity: &DocumentId) -> Result<VersionsResponse, ClientError> {
        let url = format!("{}{identity}/", self.config.versions_url);
        let transport = self.clone();
        on_blocking_pool(move || transport.get_json(url)).await
    }

    async fn restore(&self, version_id: u64) -> Result<RestoreResponse, ClientError> {
        let url = format!("{}{version_id}/", self.config.restore_url);
        let transport = self.clone();
        on_blocking_pool(move || transport.post_json(url, None)).await
    }

    async fn status(&self, identity: &DocumentId) -> Result<StatusResponse, ClientError> {
        let url = format!("{}{identity}/", self.config.status_url);
        let transport = self.clone();
        on_blocking_pool(move || transport.get_json(url)).await
    }

    async fn publish(&self, identity: &DocumentId) -> Result<PublishResponse, ClientError> {
        let url = format!("{}{identity}/", self.config.publish_url);
        let transport = self.clone();
        on_blocking_pool(move || transport.post_json(url, None)).await
    }
}
