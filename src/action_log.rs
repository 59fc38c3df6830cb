//! Action logging for Cadence commands.
//!
//! Every CLI invocation appends one JSONL entry to `<data-dir>/action.log`.
//! Logging failures surface as warnings on stderr, never as command
//! failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the audit log inside the data dir.
pub const LOG_FILE: &str = "action.log";

/// A single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// When the command ran
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "cycle.create", "todo")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,
}

fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Append an entry to the action log. Never fails; IO problems print a
/// warning and are otherwise swallowed.
pub fn log_action(
    data_dir: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    let entry = ActionLog {
        timestamp: Utc::now(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
    };

    if let Err(e) = write_entry(&log_path(data_dir), &entry) {
        eprintln!("Warning: Failed to write action log: {}", e);
    }
}

fn write_entry(path: &Path, entry: &ActionLog) -> std::io::Result<()> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

/// Read the most recent `limit` entries, oldest first. Unparseable lines
/// are skipped. An absent log reads as empty.
pub fn read_log(data_dir: &Path, limit: usize) -> Vec<ActionLog> {
    let raw = match std::fs::read_to_string(log_path(data_dir)) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };

    let entries: Vec<ActionLog> = raw
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let skip = entries.len().saturating_sub(limit);
    entries.into_iter().skip(skip).collect()
}
