//! Error types for the nootify client
//!
//! `NotifyError` is the taxonomy surfaced by [`Notifier::send`](crate::Notifier::send).
//! `AppError` wraps it for the CLI, which also deals with settings files.

use std::path::PathBuf;
use thiserror::Error;

use crate::env::API_KEY_VARS;

/// Every condition a notification send can end in, other than success
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Process environment is not available in this host")]
    EnvironmentUnavailable,

    #[error("Nootify API Key not found. Please set one of the following environment variables: {}", API_KEY_VARS.join(", "))]
    MissingApiKey,

    #[error("A message is required to send a notification")]
    MissingMessage,

    #[error("HTTP transport is not available: {reason}")]
    TransportUnavailable { reason: String },

    #[error("Nootify API Error: {detail}")]
    ApiError { detail: String },

    #[error("Nootify Error: {message}")]
    NetworkFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl NotifyError {
    /// Create an ApiError carrying the server-supplied detail
    pub fn api(detail: impl Into<String>) -> Self {
        Self::ApiError {
            detail: detail.into(),
        }
    }

    /// Create a NetworkFailure wrapping the underlying cause
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::NetworkFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Short stable name of the condition, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EnvironmentUnavailable => "environment_unavailable",
            Self::MissingApiKey => "missing_api_key",
            Self::MissingMessage => "missing_message",
            Self::TransportUnavailable { .. } => "transport_unavailable",
            Self::ApiError { .. } => "api_error",
            Self::NetworkFailure { .. } => "network_failure",
        }
    }
}

/// CLI application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid notification input: {reason}")]
    InvalidInput { reason: String },
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
