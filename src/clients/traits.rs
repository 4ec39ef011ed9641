use async_trait::async_trait;
use serde_json::Value;

use crate::errors::NotifyError;

/// Raw outcome of one HTTP exchange, before any API-level interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`, when known
    pub reason: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers a JSON body to an endpoint with a single POST
///
/// Implementations perform exactly one request per call: no retries, no
/// timeout. Connection-level failures map to [`NotifyError::NetworkFailure`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, NotifyError>;
}
