//! Nootify client library
//!
//! Sends notifications to the Nootify API. Resolve a [`NotifierConfig`] once
//! (from the environment via [`env::EnvResolver`] or from a settings file via
//! [`config::ConfigManager`]) and hand it to a [`Notifier`].

pub mod clients;
pub mod config;
pub mod env;
pub mod errors;
pub mod notifier;
pub mod request;

// Re-export commonly used types for convenience
pub use config::NotifierConfig;
pub use env::ActivePolicy;
pub use errors::NotifyError;
pub use notifier::{Delivery, Notifier};
pub use request::{AdvancedRequest, FlagField, NotificationRequest};
