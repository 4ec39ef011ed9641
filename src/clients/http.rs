use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::traits::{Transport, TransportResponse};
use crate::errors::NotifyError;

const USER_AGENT: &str = concat!("nootify/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the underlying HTTP client
    ///
    /// Fails with [`NotifyError::TransportUnavailable`] when the TLS backend
    /// or resolver cannot be initialised.
    pub fn new() -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NotifyError::TransportUnavailable {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, NotifyError> {
        debug!(url, "Posting notification");

        let response = self
            .client
            .post(url)
            .headers(Self::build_headers())
            .json(body)
            .send()
            .await
            .map_err(|e| NotifyError::network_with_source("Failed to send notification", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::network_with_source("Failed to read response body", e))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}
