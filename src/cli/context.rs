//! CLI Context for dependency injection and shared state
//!
//! Centralizes settings loading and logging setup so handlers only deal
//! with their own command.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use nootify::config::{ConfigManager, NotifierConfig};
use nootify::env::{ActivePolicy, ProcessEnv};
use nootify::errors::AppResult;

/// CLI execution context containing shared dependencies and configuration
#[derive(Clone)]
pub struct CliContext {
    pub config_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub verbose: bool,
    pub active_policy: Option<ActivePolicy>,
    pub config_manager: Arc<ConfigManager>,
}

impl CliContext {
    /// Load settings and apply command line overrides
    pub fn new(
        config_path: Option<PathBuf>,
        endpoint: Option<String>,
        active_policy: Option<ActivePolicy>,
        verbose: bool,
    ) -> Result<Self> {
        let config_manager = ConfigManager::new(config_path.clone())?;
        Ok(Self::with_manager(config_manager, config_path, endpoint, active_policy, verbose))
    }

    /// Like [`new`](Self::new), but starts from default settings and never
    /// reads the settings file
    pub fn without_settings_file(
        config_path: Option<PathBuf>,
        endpoint: Option<String>,
        active_policy: Option<ActivePolicy>,
        verbose: bool,
    ) -> Result<Self> {
        let config_manager = ConfigManager::from_defaults(config_path.clone())?;
        Ok(Self::with_manager(config_manager, config_path, endpoint, active_policy, verbose))
    }

    fn with_manager(
        mut config_manager: ConfigManager,
        config_path: Option<PathBuf>,
        endpoint: Option<String>,
        active_policy: Option<ActivePolicy>,
        verbose: bool,
    ) -> Self {
        if let Some(endpoint) = &endpoint {
            config_manager.settings_mut().endpoint = endpoint.clone();
        }

        Self {
            config_path,
            endpoint,
            verbose,
            active_policy,
            config_manager: Arc::new(config_manager),
        }
    }

    /// Initialize logging subsystem based on verbosity and configuration
    pub fn init_logging(&self) -> Result<()> {
        let log_level = if self.verbose {
            "debug"
        } else {
            self.config_manager.settings().log_level.as_str()
        };

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive(
                    log_level
                        .parse()
                        .unwrap_or_else(|_| tracing::Level::INFO.into()),
                ),
            )
            .init();

        if self.verbose {
            tracing::debug!("Verbose logging enabled");
            tracing::debug!("Config path: {:?}", self.config_manager.config_path());
        }

        Ok(())
    }

    /// Notifier configuration from the process environment and settings
    pub fn notifier_config(&self) -> AppResult<NotifierConfig> {
        self.config_manager
            .notifier_config(&ProcessEnv, self.active_policy)
    }
}
