//! Configuration resolution from environment variables
//!
//! Lookups go through [`EnvSource`] so the notifier never reads the process
//! environment implicitly. Applications resolve once at startup and pass the
//! resulting [`NotifierConfig`] into the [`Notifier`](crate::Notifier).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::NotifierConfig;
use crate::errors::NotifyError;

/// API key variables, highest priority first
pub const API_KEY_VARS: &[&str] = &[
    "NOOTIFY_BACKEND_API_KEY",
    "NEXT_PUBLIC_NOOTIFY_API_KEY",
    "VITE_NOOTIFY_API_KEY",
    "REACT_APP_NOOTIFY_API_KEY",
    "NOOTIFY_API_KEY",
];

/// Active flag variables, highest priority first
pub const ACTIVE_VARS: &[&str] = &[
    "NOOTIFY_ACTIVE",
    "NEXT_PUBLIC_NOOTIFY_ACTIVE",
    "VITE_NOOTIFY_ACTIVE",
    "REACT_APP_NOOTIFY_ACTIVE",
];

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Whether this host exposes an environment at all
    fn is_available(&self) -> bool {
        true
    }

    fn var(&self, name: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, for tests and hosts that inject their own values
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// A host without any environment
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl EnvSource for NoEnv {
    fn is_available(&self) -> bool {
        false
    }

    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

/// How the active flag is interpreted
///
/// There is intentionally no `Default`: whether an unset flag means active or
/// inactive is a decision the embedding application has to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivePolicy {
    /// Active when unset; when set, active only for `true` in any case
    DefaultActive,
    /// Active only when set to exactly `true`
    DefaultInactive,
}

impl ActivePolicy {
    pub fn evaluate(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (ActivePolicy::DefaultActive, None) => true,
            (ActivePolicy::DefaultActive, Some(v)) => v.eq_ignore_ascii_case("true"),
            (ActivePolicy::DefaultInactive, None) => false,
            (ActivePolicy::DefaultInactive, Some(v)) => v == "true",
        }
    }
}

impl std::str::FromStr for ActivePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default-active" => Ok(ActivePolicy::DefaultActive),
            "default-inactive" => Ok(ActivePolicy::DefaultInactive),
            other => Err(format!(
                "unknown active policy '{other}', expected 'default-active' or 'default-inactive'"
            )),
        }
    }
}

/// Resolves notifier settings from an [`EnvSource`]
pub struct EnvResolver<'a> {
    source: &'a dyn EnvSource,
}

impl<'a> EnvResolver<'a> {
    pub fn new(source: &'a dyn EnvSource) -> Self {
        Self { source }
    }

    /// First non-empty value among `names`, with the name it came from
    pub fn first_set(&self, names: &[&'static str]) -> Option<(&'static str, String)> {
        names.iter().find_map(|name| {
            self.source
                .var(name)
                .filter(|value| !value.is_empty())
                .map(|value| (*name, value))
        })
    }

    pub fn api_key(&self) -> Option<String> {
        self.first_set(API_KEY_VARS).map(|(_, value)| value)
    }

    /// Raw active flag value, if any variable is set
    pub fn active_flag(&self) -> Option<String> {
        self.first_set(ACTIVE_VARS).map(|(_, value)| value)
    }

    /// Build a [`NotifierConfig`] from the environment
    ///
    /// A missing API key is carried as `None` and reported when sending.
    pub fn resolve(&self, policy: ActivePolicy) -> Result<NotifierConfig, NotifyError> {
        if !self.source.is_available() {
            return Err(NotifyError::EnvironmentUnavailable);
        }

        let api_key = self.api_key();
        let active = policy.evaluate(self.active_flag().as_deref());
        debug!(
            has_api_key = api_key.is_some(),
            active,
            ?policy,
            "Resolved notifier configuration from environment"
        );

        Ok(NotifierConfig::new(api_key, active))
    }
}
