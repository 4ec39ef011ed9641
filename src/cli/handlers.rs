//! Command handlers for all CLI operations
//!
//! Keeps clap parsing separate from the work each command does.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{self, Read};
use tracing::{debug, info};

use super::{CliContext, Commands, ConfigAction};
use nootify::config::{mask_secret, ConfigManager};
use nootify::env::{EnvResolver, EnvSource, ProcessEnv, ACTIVE_VARS, API_KEY_VARS};
use nootify::errors::{AppError, AppResult};
use nootify::notifier::{Delivery, Notifier};
use nootify::request::{AdvancedRequest, NotificationRequest};

/// Coordinates all command handling operations
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their handlers
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Send {
                message,
                title,
                flag,
                stdin,
            } => self.handle_send(message, title, flag, stdin).await,
            Commands::Init { force } => self.handle_init(force),
            Commands::Config { action } => self.handle_config(action),
            Commands::Env => self.handle_env(),
        }
    }

    async fn handle_send(
        &self,
        message: Option<String>,
        title: Option<String>,
        flag: bool,
        stdin: bool,
    ) -> Result<()> {
        let request = if stdin {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read notification from stdin")?;
            parse_request_input(&input)?
        } else {
            build_request(message.unwrap_or_default(), title, flag)
        };

        let config = self.context.notifier_config()?;
        debug!(?config, "Sending notification");
        let notifier = Notifier::new(config);

        match notifier.send(request).await? {
            Delivery::Sent => println!("Notification sent"),
            Delivery::Skipped => println!("Nootify is inactive; notification not sent"),
        }
        Ok(())
    }

    fn handle_init(&self, force: bool) -> Result<()> {
        let mut manager = ConfigManager::from_defaults(self.context.config_path.clone())?;

        if manager.config_path().exists() && !force {
            println!(
                "Settings already exist at {} (use --force to overwrite)",
                manager.config_path().display()
            );
            return Ok(());
        }

        let settings = manager.settings_mut();
        settings.active_policy = self.context.active_policy;
        if let Some(endpoint) = &self.context.endpoint {
            settings.endpoint = endpoint.clone();
        }
        manager.save()?;

        info!(path = %manager.config_path().display(), "Settings written");
        println!("Settings written to {}", manager.config_path().display());
        if manager.settings().active_policy.is_none() {
            println!("Set active_policy to 'default-active' or 'default-inactive' before sending");
        }
        Ok(())
    }

    fn handle_config(&self, action: ConfigAction) -> Result<()> {
        match action {
            ConfigAction::Show => {
                let manager = &self.context.config_manager;
                println!("# {}", manager.config_path().display());
                print!("{}", manager.to_masked_toml()?);
                Ok(())
            }
        }
    }

    fn handle_env(&self) -> Result<()> {
        print!("{}", describe_env(&ProcessEnv));
        Ok(())
    }
}

/// Build a request from command line arguments
///
/// Without a title or flag this is a plain message.
fn build_request(message: String, title: Option<String>, flag: bool) -> NotificationRequest {
    if title.is_none() && !flag {
        return NotificationRequest::Simple(message);
    }

    let mut request = AdvancedRequest::new(message).with_flag(flag);
    request.title = title;
    request.into()
}

/// Parse stdin input: a JSON string or object, otherwise plain text
fn parse_request_input(input: &str) -> AppResult<NotificationRequest> {
    let trimmed = input.trim_end_matches(['\r', '\n']);

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ (Value::String(_) | Value::Object(_))) => serde_json::from_value(value)
            .map_err(|e| AppError::invalid_input(format!("not a notification request: {e}"))),
        _ => Ok(NotificationRequest::Simple(trimmed.to_string())),
    }
}

/// Human-readable report of the recognized variables
fn describe_env(env: &dyn EnvSource) -> String {
    let resolver = EnvResolver::new(env);
    let mut out = String::new();

    let key_source = resolver.first_set(API_KEY_VARS).map(|(name, _)| name);
    out.push_str("API key variables:\n");
    for name in API_KEY_VARS {
        let value = env
            .var(name)
            .filter(|v| !v.is_empty())
            .map(|v| mask_secret(&v))
            .unwrap_or_else(|| "(unset)".to_string());
        let marker = if key_source == Some(*name) { " <- used" } else { "" };
        out.push_str(&format!("  {name} = {value}{marker}\n"));
    }

    let active_source = resolver.first_set(ACTIVE_VARS).map(|(name, _)| name);
    out.push_str("Active flag variables:\n");
    for name in ACTIVE_VARS {
        let value = env
            .var(name)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "(unset)".to_string());
        let marker = if active_source == Some(*name) { " <- used" } else { "" };
        out.push_str(&format!("  {name} = {value}{marker}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nootify::env::MapEnv;

    #[test]
    fn test_build_request_plain() {
        let request = build_request("hello".to_string(), None, false);
        assert_eq!(request, NotificationRequest::Simple("hello".to_string()));
    }

    #[test]
    fn test_build_request_advanced() {
        let request = build_request("hello".to_string(), Some("T".to_string()), true);
        assert_eq!(request.title(), Some("T"));
        assert!(request.flag());
    }

    #[test]
    fn test_parse_plain_text_input() {
        let request = parse_request_input("build finished\n").unwrap();
        assert_eq!(request.message(), "build finished");

        let request = parse_request_input("42").unwrap();
        assert_eq!(request.message(), "42");
    }

    #[test]
    fn test_parse_json_input() {
        let request =
            parse_request_input(r#"{"message": "m", "title": "t", "silent": true}"#).unwrap();
        assert_eq!(request.message(), "m");
        assert_eq!(request.title(), Some("t"));
        assert!(request.flag());

        let request = parse_request_input(r#""quoted""#).unwrap();
        assert_eq!(request, NotificationRequest::Simple("quoted".to_string()));
    }

    #[test]
    fn test_parse_json_object_without_message() {
        let result = parse_request_input(r#"{"title": "t"}"#);
        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[test]
    fn test_parse_json_input_with_both_flag_keys() {
        let result = parse_request_input(r#"{"message": "m", "silent": true, "broadcast": false}"#);
        match result {
            Err(AppError::InvalidInput { reason }) => {
                assert!(reason.contains("both silent and broadcast given"))
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_env_marks_used_variable() {
        let env = MapEnv::new()
            .with("VITE_NOOTIFY_API_KEY", "abcdefgh")
            .with("REACT_APP_NOOTIFY_API_KEY", "zzzzzzzz")
            .with("NOOTIFY_ACTIVE", "true");
        let report = describe_env(&env);

        assert!(report.contains("VITE_NOOTIFY_API_KEY = ****efgh <- used"));
        assert!(report.contains("REACT_APP_NOOTIFY_API_KEY = ****zzzz\n"));
        assert!(report.contains("NOOTIFY_BACKEND_API_KEY = (unset)"));
        assert!(report.contains("NOOTIFY_ACTIVE = true <- used"));
        assert!(!report.contains("abcdefgh"));
    }
}
