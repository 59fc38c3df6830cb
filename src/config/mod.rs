//! User preferences for Cadence.
//!
//! Preferences live in a TOML file at `<config dir>/cadence/config.toml`:
//!
//! ```toml
//! output_format = "human"          # or "json"
//! default_parent_dir = "/home/me/cycles"
//! backend = "folder"               # or "kv"
//! ```
//!
//! Precedence: CLI flag > config file > built-in default. A missing or
//! invalid config file behaves as all-defaults; preferences must never
//! make a command fail.

use crate::storage::BackendType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Default output format for CLI commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Parent folder used by `cycle create` when `--parent` is omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_parent_dir: Option<PathBuf>,

    /// Storage backend name ("folder" or "kv")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

/// Config keys accepted by `cad config get/set`.
pub const CONFIG_KEYS: &[&str] = &["output-format", "default-parent-dir", "backend"];

impl CadenceConfig {
    /// Load the config from the given file. Missing or unparseable files
    /// load as defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Load from the default location, when one can be resolved.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Persist the config to the given file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("serialize config error: {}", e)))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// The backend preference, defaulting to the folder backend.
    pub fn backend_type(&self) -> BackendType {
        self.backend
            .as_deref()
            .and_then(BackendType::parse)
            .unwrap_or_default()
    }

    /// Read a value by config key; None when unset.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "output-format" => Ok(self.output_format.map(|f| f.to_string())),
            "default-parent-dir" => Ok(self
                .default_parent_dir
                .as_ref()
                .map(|p| p.display().to_string())),
            "backend" => Ok(self.backend.clone()),
            _ => Err(Error::InvalidInput(format!(
                "Unknown config key: {} (expected one of: {})",
                key,
                CONFIG_KEYS.join(", ")
            ))),
        }
    }

    /// Set a value by config key, validating the new value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "output-format" => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Invalid output format: {} (expected json or human)",
                        value
                    ))
                })?;
                self.output_format = Some(format);
            }
            "default-parent-dir" => {
                self.default_parent_dir = Some(PathBuf::from(value));
            }
            "backend" => {
                let backend = BackendType::parse(value).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Invalid backend: {} (expected folder or kv)",
                        value
                    ))
                })?;
                self.backend = Some(backend.as_str().to_string());
            }
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Path of the config file: `<platform config dir>/cadence/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("cadence").join("config.toml"))
}
