//! CLI argument definitions for Cadence.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cadence - A cycle-based planner for goals, works, and tasks.
///
/// Start with `cad cycle create <name>` to open a planning cycle, then add
/// goals, works, and tasks to it. `cad todo` and `cad calendar` show what is
/// coming up.
#[derive(Parser, Debug)]
#[command(name = "cad")]
#[command(author, version, about = "A CLI planner organizing goals, works, and tasks into cycles", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Override the data directory holding the cycle index and flat storage.
    /// Can also be set via CADENCE_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "CADENCE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cycle management commands (create, import, select, list)
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },

    /// Goal management commands
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Work management commands
    Work {
        #[command(subcommand)]
        command: WorkCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Show tasks due within the next 30 days, grouped by work
    Todo {
        /// Include tasks that are already done
        #[arg(long)]
        all: bool,
    },

    /// Show dated goals, works, and tasks for a month
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Show the audit trail of recent commands
    Log {
        /// Maximum number of entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// System commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

/// Cycle subcommands
#[derive(Subcommand, Debug)]
pub enum CycleCommands {
    /// Create a new cycle and select it if nothing is selected yet
    Create {
        /// Cycle name
        name: String,

        /// Parent directory for the cycle folder (folder backend only).
        /// Falls back to the default-parent-dir config value.
        #[arg(long)]
        parent: Option<PathBuf>,
    },

    /// Import an existing cycle folder and select it
    Import {
        /// Folder containing a cycle_data.json document
        folder: PathBuf,
    },

    /// Select the cycle that goal/work/task commands operate on
    Select {
        /// Cycle ID
        id: String,
    },

    /// List known cycles
    List,
}

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Add a goal to the selected cycle
    Add {
        /// Goal title
        title: String,

        /// Start date as YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// End date as YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
    },

    /// List goals with derived status and progress
    List {
        /// Hide goals whose works are all done
        #[arg(long)]
        hide_done: bool,
    },

    /// Remove a goal and everything attached to it
    Rm {
        /// Goal ID
        id: String,
    },
}

/// Work subcommands
#[derive(Subcommand, Debug)]
pub enum WorkCommands {
    /// Add a work to the selected cycle
    Add {
        /// Work title
        title: String,

        /// Goal to attach the work to
        #[arg(long)]
        goal: Option<String>,

        /// Initial status (not-started, in-progress, done)
        #[arg(long)]
        status: Option<String>,

        /// Start date as YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// End date as YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,

        /// Free-form body text
        #[arg(long)]
        body: Option<String>,
    },

    /// List works, optionally only those attached to one goal
    List {
        /// Filter by goal ID
        #[arg(long)]
        goal: Option<String>,
    },

    /// Set the status of a work
    Status {
        /// Work ID
        id: String,

        /// New status (not-started, in-progress, done)
        status: String,
    },

    /// Update fields of a work (unset flags are left unchanged)
    Update {
        /// Work ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New status (not-started, in-progress, done)
        #[arg(long)]
        status: Option<String>,

        /// New start date as YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// New end date as YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,

        /// New body text
        #[arg(long)]
        body: Option<String>,
    },

    /// Remove a work and its tasks
    Rm {
        /// Work ID
        id: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task under a work
    Add {
        /// Task title
        title: String,

        /// Parent work ID
        #[arg(long)]
        work: String,

        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, optionally only those under one work
    List {
        /// Filter by work ID
        #[arg(long)]
        work: Option<String>,
    },

    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },

    /// Update fields of a task (unset flags are left unchanged)
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },

    /// Remove a task
    Rm {
        /// Task ID
        id: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Key (output-format, default-parent-dir, backend)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Key (output-format, default-parent-dir, backend)
        key: String,

        /// Value
        value: String,
    },

    /// List all configuration values
    List,
}

/// System subcommands
#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Show version, build, and storage information
    Info,
}
