//! Common test utilities and helpers
//!
//! Builds `nootify` commands with a clean environment and a private
//! settings file, so tests never see the developer's own configuration.

#![allow(dead_code)]

use assert_cmd::Command;
use nootify::env::{ACTIVE_VARS, API_KEY_VARS};
use std::path::PathBuf;
use tempfile::TempDir;

const OTHER_VARS: &[&str] = &[
    "NOOTIFY_CONFIG",
    "NOOTIFY_ENDPOINT",
    "NOOTIFY_ACTIVE_POLICY",
    "RUST_LOG",
];

/// Test command builder for the nootify CLI
pub struct TestCommand {
    cmd: Command,
    config_dir: TempDir,
}

impl TestCommand {
    /// Create a command with every nootify variable removed
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp dir");
        let mut cmd = Command::cargo_bin("nootify").expect("Failed to find nootify binary");
        for name in API_KEY_VARS.iter().chain(ACTIVE_VARS).chain(OTHER_VARS) {
            cmd.env_remove(name);
        }
        cmd.env("NOOTIFY_CONFIG", config_dir.path().join("config.toml"));
        Self { cmd, config_dir }
    }

    /// Path of the private settings file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.toml")
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.cmd.env(key.as_ref(), val.as_ref());
        self
    }

    pub fn stdin<S: AsRef<str>>(mut self, input: S) -> Self {
        self.cmd.write_stdin(input.as_ref().to_string());
        self
    }

    /// Run the command; the settings directory lives as long as the result
    pub fn run(mut self) -> (assert_cmd::assert::Assert, TempDir) {
        let assert = self.cmd.assert();
        (assert, self.config_dir)
    }
}

impl Default for TestCommand {
    fn default() -> Self {
        Self::new()
    }
}
