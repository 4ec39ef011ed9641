//! Centralized error handling module
//!
//! Typed errors for the notifier core and the CLI layer.

pub mod types;

pub use types::{AppError, AppResult, NotifyError};
