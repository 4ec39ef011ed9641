//! Notification requests and the JSON payload sent to the Nootify API

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::fmt;

/// JSON key the per-request boolean flag is sent under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagField {
    /// `silent`: the remote service only logs the notification when set
    Silent,
    /// `broadcast`: the remote service pushes to all subscribers when set
    #[default]
    Broadcast,
}

impl FlagField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagField::Silent => "silent",
            FlagField::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for FlagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured notification with optional title and flag
///
/// The flag may be given as `flag`, `silent` or `broadcast`, but only once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawAdvancedRequest")]
pub struct AdvancedRequest {
    pub message: String,
    pub title: Option<String>,
    pub flag: Option<bool>,
}

#[derive(Deserialize)]
struct RawAdvancedRequest {
    message: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    flag: Option<bool>,
    #[serde(default)]
    silent: Option<bool>,
    #[serde(default)]
    broadcast: Option<bool>,
}

impl TryFrom<RawAdvancedRequest> for AdvancedRequest {
    type Error = String;

    fn try_from(raw: RawAdvancedRequest) -> Result<Self, Self::Error> {
        let given: Vec<(&str, bool)> = [
            ("flag", raw.flag),
            ("silent", raw.silent),
            ("broadcast", raw.broadcast),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect();

        if let [(first, _), (second, _), ..] = given.as_slice() {
            return Err(format!("both {first} and {second} given; use only one flag key"));
        }

        Ok(Self {
            message: raw.message,
            title: raw.title,
            flag: given.first().map(|(_, value)| *value),
        })
    }
}

impl AdvancedRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_flag(mut self, flag: bool) -> Self {
        self.flag = Some(flag);
        self
    }
}

/// A notification to send: either a bare message or a structured request
///
/// Deserializes from either a JSON string or a JSON object, so
/// `"deploy done"` and `{"message": "deploy done", "silent": true}` both work.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawNotificationRequest")]
pub enum NotificationRequest {
    Simple(String),
    Advanced(AdvancedRequest),
}

// Flag key conflicts are checked after the untagged match, so they surface
// as their own error instead of "did not match any variant".
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNotificationRequest {
    Simple(String),
    Advanced(RawAdvancedRequest),
}

impl TryFrom<RawNotificationRequest> for NotificationRequest {
    type Error = String;

    fn try_from(raw: RawNotificationRequest) -> Result<Self, Self::Error> {
        match raw {
            RawNotificationRequest::Simple(message) => Ok(NotificationRequest::Simple(message)),
            RawNotificationRequest::Advanced(raw) => {
                raw.try_into().map(NotificationRequest::Advanced)
            }
        }
    }
}

impl NotificationRequest {
    pub fn message(&self) -> &str {
        match self {
            NotificationRequest::Simple(message) => message,
            NotificationRequest::Advanced(request) => &request.message,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            NotificationRequest::Simple(_) => None,
            NotificationRequest::Advanced(request) => request.title.as_deref(),
        }
    }

    pub fn flag(&self) -> bool {
        match self {
            NotificationRequest::Simple(_) => false,
            NotificationRequest::Advanced(request) => request.flag.unwrap_or(false),
        }
    }
}

impl From<&str> for NotificationRequest {
    fn from(message: &str) -> Self {
        NotificationRequest::Simple(message.to_string())
    }
}

impl From<String> for NotificationRequest {
    fn from(message: String) -> Self {
        NotificationRequest::Simple(message)
    }
}

impl From<AdvancedRequest> for NotificationRequest {
    fn from(request: AdvancedRequest) -> Self {
        NotificationRequest::Advanced(request)
    }
}

/// Body of the POST to the notification endpoint
///
/// Serializes to `{token, title, message, <flag>}`; `title` is left out when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPayload<'a> {
    pub token: &'a str,
    pub title: Option<&'a str>,
    pub message: &'a str,
    pub flag_field: FlagField,
    pub flag: bool,
}

impl<'a> OutboundPayload<'a> {
    pub fn new(token: &'a str, request: &'a NotificationRequest, flag_field: FlagField) -> Self {
        Self {
            token,
            title: request.title(),
            message: request.message(),
            flag_field,
            flag: request.flag(),
        }
    }
}

impl Serialize for OutboundPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.title.is_some() { 4 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("token", self.token)?;
        if let Some(title) = self.title {
            map.serialize_entry("title", title)?;
        }
        map.serialize_entry("message", self.message)?;
        map.serialize_entry(self.flag_field.as_str(), &self.flag)?;
        map.end()
    }
}
