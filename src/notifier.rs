//! The notifier: validates a request and delivers it to the Nootify API
//!
//! [`Notifier::send`] awaits the request and reports every failure as a
//! [`NotifyError`]. [`Notifier::dispatch`] is the fire-and-forget form: it
//! spawns `send` and only logs the outcome.

use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clients::{HttpTransport, Transport, TransportResponse};
use crate::config::NotifierConfig;
use crate::env::{ActivePolicy, EnvResolver, EnvSource};
use crate::errors::NotifyError;
use crate::request::{NotificationRequest, OutboundPayload};

/// Successful outcome of a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The API accepted the notification
    Sent,
    /// Notifications are inactive; nothing was sent
    Skipped,
}

/// Sends notifications with a fixed configuration
///
/// Cloning is cheap; clones share the HTTP transport.
///
/// ```rust,no_run
/// use nootify::{AdvancedRequest, Notifier, NotifierConfig};
///
/// # async fn run() -> Result<(), nootify::NotifyError> {
/// let notifier = Notifier::new(NotifierConfig::new(Some("key".to_string()), true));
/// notifier.send("This just works!").await?;
/// notifier
///     .send(AdvancedRequest::new("We just launched!").with_title("Big News").with_flag(true))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Notifier {
    config: NotifierConfig,
    transport: Result<Arc<dyn Transport>, String>,
}

impl Notifier {
    /// Create a notifier backed by [`HttpTransport`]
    ///
    /// If the HTTP client cannot be built the notifier is still returned;
    /// sends then fail with [`NotifyError::TransportUnavailable`].
    pub fn new(config: NotifierConfig) -> Self {
        let transport = match HttpTransport::new() {
            Ok(transport) => Ok(Arc::new(transport) as Arc<dyn Transport>),
            Err(e) => {
                warn!(error = %e, "HTTP transport unavailable");
                Err(e.to_string())
            }
        };

        Self { config, transport }
    }

    /// Resolve configuration from `source` and create a notifier
    pub fn from_env(source: &dyn EnvSource, policy: ActivePolicy) -> Result<Self, NotifyError> {
        let config = EnvResolver::new(source).resolve(policy)?;
        Ok(Self::new(config))
    }

    /// Create a notifier with a custom transport
    pub fn with_transport(config: NotifierConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport: Ok(transport),
        }
    }

    /// Create a notifier for a host that has no HTTP capability
    pub fn without_transport(config: NotifierConfig, reason: impl Into<String>) -> Self {
        Self {
            config,
            transport: Err(reason.into()),
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Send one notification and wait for the API's answer
    ///
    /// Checks run in order: API key, active flag, message, transport. Only
    /// when all pass is a single POST issued. An inactive notifier returns
    /// [`Delivery::Skipped`] without error.
    pub async fn send(
        &self,
        request: impl Into<NotificationRequest>,
    ) -> Result<Delivery, NotifyError> {
        let request = request.into();

        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(NotifyError::MissingApiKey)?;

        if !self.config.active {
            info!("Nootify is disabled (NOOTIFY_ACTIVE is not 'true'). Notification not sent.");
            return Ok(Delivery::Skipped);
        }

        if request.message().is_empty() {
            return Err(NotifyError::MissingMessage);
        }

        let transport = self
            .transport
            .as_ref()
            .map_err(|reason| NotifyError::TransportUnavailable {
                reason: reason.clone(),
            })?;

        let payload = OutboundPayload::new(api_key, &request, self.config.flag_field);
        let body = serde_json::to_value(&payload)
            .map_err(|e| NotifyError::network_with_source("Failed to encode notification", e))?;

        let response = transport.post_json(&self.config.endpoint, &body).await?;
        debug!(status = response.status, "Nootify API responded");

        interpret_response(&response)?;
        Ok(Delivery::Sent)
    }

    /// Send in the background without surfacing the result
    ///
    /// Every failure is logged and swallowed. The returned handle may be
    /// dropped; awaiting it only waits for completion. Outside a tokio
    /// runtime nothing is sent: the condition is logged and `None` returned.
    pub fn dispatch(&self, request: impl Into<NotificationRequest>) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "No async runtime; notification not sent");
                return None;
            }
        };

        let notifier = self.clone();
        let request = request.into();

        Some(runtime.spawn(async move {
            match notifier.send(request).await {
                Ok(delivery) => debug!(?delivery, "Background notification finished"),
                Err(e) => error!(kind = e.kind(), "{}", e),
            }
        }))
    }
}

/// Map an HTTP response onto the API's success/error contract
fn interpret_response(response: &TransportResponse) -> Result<(), NotifyError> {
    if !response.is_success() {
        let detail = serde_json::from_str::<Value>(&response.body)
            .ok()
            .as_ref()
            .and_then(error_detail)
            .unwrap_or_else(|| match &response.reason {
                Some(reason) => format!("HTTP error! status: {} {}", response.status, reason),
                None => format!("HTTP error! status: {}", response.status),
            });
        return Err(NotifyError::api(detail));
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| NotifyError::network_with_source("Failed to parse API response", e))?;

    match error_detail(&body) {
        Some(detail) => Err(NotifyError::api(detail)),
        None => Ok(()),
    }
}

/// The `error` field of a response body, if present and truthy
fn error_detail(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
