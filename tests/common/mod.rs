//! Common test utilities for cadence integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's real data or config directories.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data storage.
///
/// Each `TestEnv` creates three temporary directories:
/// - `parent_dir`: Where cycle folders get created (via `--parent`)
/// - `data_dir`: Holds the index and flat storage (via `CADENCE_DATA_DIR`)
/// - `config_dir`: Redirects the config file (via `XDG_CONFIG_HOME`)
///
/// The `cad()` method returns a `Command` that sets the environment
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub parent_dir: TempDir,
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            parent_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with one cycle created and selected.
    pub fn with_cycle(name: &str) -> Self {
        let env = Self::new();
        let parent = env.parent_path().to_string_lossy().to_string();
        env.cad()
            .args(["cycle", "create", name, "--parent", &parent])
            .assert()
            .success();
        env
    }

    /// Get a Command for the cad binary with an isolated environment.
    pub fn cad(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cad"));
        cmd.env("CADENCE_DATA_DIR", self.data_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_dir.path());
        cmd
    }

    /// Get the path to the parent directory for cycle folders.
    pub fn parent_path(&self) -> &std::path::Path {
        self.parent_dir.path()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

/// Extract the `id` of an entity wrapped under `key` in a command's JSON
/// stdout, e.g. `{"goal":{"id":"goal_..."}}`.
pub fn entity_id(stdout: &[u8], key: &str) -> String {
    let value: serde_json::Value = serde_json::from_slice(stdout).unwrap();
    value[key]["id"].as_str().unwrap().to_string()
}
