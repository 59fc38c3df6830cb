//! Cadence - a personal planner organizing Goals, Works, and Tasks into
//! time-boxed Cycles.
//!
//! This library provides the core functionality for the `cad` CLI tool:
//! cycle management, per-cycle JSON document storage, derived goal
//! status/progress, and agenda projections (calendar, 30-day todo window).

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;


/// Library-level error type for Cadence operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No cycle is selected: run `cad cycle select <id>` first")]
    NoCycleSelected,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Cadence operations.
pub type Result<T> = std::result::Result<T, Error>;
