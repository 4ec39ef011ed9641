use crate::env::{ActivePolicy, EnvResolver, EnvSource};
use crate::errors::{AppError, AppResult, NotifyError};
use crate::request::FlagField;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Fixed Nootify notification endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.nootifyme.com/api/notification";

/// Everything a [`Notifier`](crate::Notifier) needs to send
///
/// Built once by the application, usually through
/// [`EnvResolver::resolve`](crate::env::EnvResolver::resolve) or
/// [`ConfigManager::notifier_config`].
#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub api_key: Option<String>,
    pub active: bool,
    pub endpoint: String,
    pub flag_field: FlagField,
}

impl NotifierConfig {
    pub fn new(api_key: Option<String>, active: bool) -> Self {
        Self {
            api_key,
            active,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            flag_field: FlagField::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_flag_field(mut self, flag_field: FlagField) -> Self {
        self.flag_field = flag_field;
        self
    }
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("active", &self.active)
            .field("endpoint", &self.endpoint)
            .field("flag_field", &self.flag_field)
            .finish()
    }
}

/// Mask all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// Settings file contents
///
/// Environment variables take precedence over every value here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_policy: Option<ActivePolicy>,
    #[serde(default)]
    pub flag_field: FlagField,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            active: None,
            active_policy: None,
            flag_field: FlagField::default(),
            endpoint: default_endpoint(),
            log_level: default_log_level(),
        }
    }
}

/// Loads and saves the nootify settings file
///
/// Without an explicit path the file lives at `~/.nootify/config.toml`.
///
/// # Example
///
/// ```rust,no_run
/// use nootify::config::ConfigManager;
/// use nootify::env::{ActivePolicy, ProcessEnv};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = ConfigManager::new(None)?;
///     let config = manager.notifier_config(&ProcessEnv, Some(ActivePolicy::DefaultInactive))?;
///     println!("Endpoint: {}", config.endpoint);
///     Ok(())
/// }
/// ```
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Load settings from `config_path`, or from the default location
    ///
    /// A missing file yields default settings; nothing is written until
    /// [`save`](Self::save) is called.
    pub fn new(config_path: Option<PathBuf>) -> AppResult<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };
        let settings = Self::load(&config_path)?;

        Ok(ConfigManager {
            config_path,
            settings,
        })
    }

    /// Default settings bound to `config_path`, without reading the file
    ///
    /// Used to write a fresh file over one that may not parse.
    pub fn from_defaults(config_path: Option<PathBuf>) -> AppResult<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        Ok(ConfigManager {
            config_path,
            settings: Settings::default(),
        })
    }

    pub fn default_config_path() -> AppResult<PathBuf> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| AppError::config("Failed to get base directories"))?;
        Ok(base_dirs.home_dir().join(".nootify").join("config.toml"))
    }

    fn load(path: &Path) -> AppResult<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
        toml::from_str(&content)
            .map_err(|e| AppError::config_with_source("Failed to parse config file", e))
    }

    /// Write the current settings to disk, creating the parent directory
    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io_with_source(parent, "create config directory", e))?;
        }
        let content = self.to_toml()?;
        fs::write(&self.config_path, content)
            .map_err(|e| AppError::io_with_source(&self.config_path, "write config file", e))?;
        Ok(())
    }

    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(&self.settings)
            .map_err(|e| AppError::config_with_source("Failed to serialize config", e))
    }

    /// Settings as TOML with the API key masked, for display
    pub fn to_masked_toml(&self) -> AppResult<String> {
        let mut settings = self.settings.clone();
        settings.api_key = settings.api_key.as_deref().map(mask_secret);
        toml::to_string_pretty(&settings)
            .map_err(|e| AppError::config_with_source("Failed to serialize config", e))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Merge environment and settings into a [`NotifierConfig`]
    ///
    /// `policy` overrides `active_policy` from the file. When no active
    /// variable is set, the file's `active` value wins, then the policy's
    /// default; with neither available this is a configuration error.
    pub fn notifier_config(
        &self,
        env: &dyn EnvSource,
        policy: Option<ActivePolicy>,
    ) -> AppResult<NotifierConfig> {
        if !env.is_available() {
            return Err(NotifyError::EnvironmentUnavailable.into());
        }

        let resolver = EnvResolver::new(env);
        let api_key = resolver
            .api_key()
            .or_else(|| self.settings.api_key.clone().filter(|key| !key.is_empty()));
        let policy = policy.or(self.settings.active_policy);

        let active = match (resolver.active_flag(), self.settings.active, policy) {
            (Some(value), _, Some(policy)) => policy.evaluate(Some(value.as_str())),
            (Some(value), _, None) => value == "true",
            (None, Some(active), _) => active,
            (None, None, Some(policy)) => policy.evaluate(None),
            (None, None, None) => {
                return Err(AppError::config(
                    "No active flag set and no active policy configured. \
                     Set NOOTIFY_ACTIVE, or set active_policy in the config file \
                     or NOOTIFY_ACTIVE_POLICY to 'default-active' or 'default-inactive'",
                ))
            }
        };

        Url::parse(&self.settings.endpoint).map_err(|e| {
            AppError::config_with_source(
                format!("Invalid endpoint URL: {}", self.settings.endpoint),
                e,
            )
        })?;

        Ok(NotifierConfig::new(api_key, active)
            .with_endpoint(self.settings.endpoint.clone())
            .with_flag_field(self.settings.flag_field))
    }
}
