mod common;

use common::TestCommand;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let (assert, _dir) = TestCommand::new().args(["--help"]).run();
    assert
        .success()
        .stdout(predicate::str::contains("Send notifications through the Nootify API"));
}

#[test]
fn test_cli_version() {
    let (assert, _dir) = TestCommand::new().args(["--version"]).run();
    assert.success().stdout(predicate::str::contains("nootify"));
}

#[test]
fn test_send_requires_message() {
    let (assert, _dir) = TestCommand::new().args(["send"]).run();
    assert.failure();
}

#[test]
fn test_send_without_api_key_fails() {
    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_ACTIVE", "true")
        .args(["send", "hello"])
        .run();
    assert
        .failure()
        .stderr(predicate::str::contains("Nootify API Key not found"));
}

#[test]
fn test_send_inactive_is_noop() {
    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_BACKEND_API_KEY", "key")
        .env("NOOTIFY_ACTIVE", "false")
        .env("NOOTIFY_ENDPOINT", "http://127.0.0.1:9/api/notification")
        .args(["send", "hello"])
        .run();
    assert
        .success()
        .stdout(predicate::str::contains("notification not sent"));
}

#[test]
fn test_send_without_active_policy_fails() {
    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_BACKEND_API_KEY", "key")
        .args(["send", "hello"])
        .run();
    assert
        .failure()
        .stderr(predicate::str::contains("no active policy configured"));
}

#[test]
fn test_send_empty_message_fails() {
    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_BACKEND_API_KEY", "key")
        .env("NOOTIFY_ACTIVE", "true")
        .args(["send", ""])
        .run();
    assert
        .failure()
        .stderr(predicate::str::contains("A message is required"));
}

#[test]
fn test_send_posts_to_endpoint() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/notification")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "token": "cli-key",
            "title": "Deploy",
            "message": "done",
            "broadcast": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true}"#)
        .create();

    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_BACKEND_API_KEY", "cli-key")
        .env("NOOTIFY_ACTIVE_POLICY", "default-active")
        .env("NOOTIFY_ENDPOINT", format!("{}/api/notification", server.url()))
        .args(["send", "done", "--title", "Deploy", "--flag"])
        .run();

    assert
        .success()
        .stdout(predicate::str::contains("Notification sent"));
    mock.assert();
}

#[test]
fn test_send_from_stdin_json() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/notification")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "token": "cli-key",
            "message": "from stdin",
            "broadcast": false
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    let (assert, _dir) = TestCommand::new()
        .env("VITE_NOOTIFY_API_KEY", "cli-key")
        .env("VITE_NOOTIFY_ACTIVE", "true")
        .env("NOOTIFY_ENDPOINT", format!("{}/api/notification", server.url()))
        .args(["send", "--stdin"])
        .stdin(r#"{"message": "from stdin"}"#)
        .run();

    assert.success();
    mock.assert();
}

#[test]
fn test_send_reports_api_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/notification")
        .with_status(200)
        .with_body(r#"{"error": "quota exceeded"}"#)
        .create();

    let (assert, _dir) = TestCommand::new()
        .env("NOOTIFY_BACKEND_API_KEY", "cli-key")
        .env("NOOTIFY_ACTIVE", "true")
        .env("NOOTIFY_ENDPOINT", format!("{}/api/notification", server.url()))
        .args(["send", "hello"])
        .run();

    assert
        .failure()
        .stderr(predicate::str::contains("quota exceeded"));
}

#[test]
fn test_init_writes_settings() {
    let command = TestCommand::new().args(["init", "--active-policy", "default-inactive"]);
    let config_path = command.config_path();
    let (assert, _dir) = command.run();

    assert
        .success()
        .stdout(predicate::str::contains("Settings written"));
    let content = std::fs::read_to_string(config_path).unwrap();
    assert!(content.contains("active_policy = \"default-inactive\""));
    assert!(content.contains("endpoint = \"https://www.nootifyme.com/api/notification\""));
}

#[test]
fn test_config_show_defaults() {
    let (assert, _dir) = TestCommand::new().args(["config", "show"]).run();
    assert
        .success()
        .stdout(predicate::str::contains("flag_field = \"broadcast\""))
        .stdout(predicate::str::contains("endpoint"));
}

#[test]
fn test_init_force_replaces_unreadable_settings() {
    let command = TestCommand::new().args([
        "init",
        "--force",
        "--endpoint",
        "http://localhost:1/x",
        "--active-policy",
        "default-active",
    ]);
    let config_path = command.config_path();
    std::fs::write(&config_path, "endpoint = [").unwrap();
    let (assert, _dir) = command.run();

    assert
        .success()
        .stdout(predicate::str::contains("Settings written"));
    let content = std::fs::read_to_string(config_path).unwrap();
    assert!(content.contains("endpoint = \"http://localhost:1/x\""));
    assert!(content.contains("active_policy = \"default-active\""));
}

#[test]
fn test_config_show_masks_key() {
    let command = TestCommand::new().args(["config", "show"]);
    std::fs::write(command.config_path(), "api_key = \"supersecretkey\"\n").unwrap();
    let (assert, _dir) = command.run();

    assert
        .success()
        .stdout(predicate::str::contains("api_key = \"**********tkey\""))
        .stdout(predicate::str::contains("supersecretkey").not());
}

#[test]
fn test_env_masks_key() {
    let (assert, _dir) = TestCommand::new()
        .env("NEXT_PUBLIC_NOOTIFY_API_KEY", "verysecretkey")
        .args(["env"])
        .run();
    assert
        .success()
        .stdout(predicate::str::contains("NEXT_PUBLIC_NOOTIFY_API_KEY = *********tkey <- used"))
        .stdout(predicate::str::contains("verysecretkey").not());
}
