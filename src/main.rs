//! Cadence CLI - a cycle-based planner for goals, works, and tasks.

use cadence::action_log;
use cadence::cli::{
    Cli, Commands, ConfigCommands, CycleCommands, GoalCommands, SystemCommands, TaskCommands,
    WorkCommands,
};
use cadence::commands::{self, Output};
use cadence::config::{self, CadenceConfig, OutputFormat};
use cadence::models::WorkStatus;
use cadence::storage::{self, Storage};
use cadence::{Error, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let config = CadenceConfig::load();

    // Output format: -H flag > config file > JSON default
    let human = cli.human_readable || config.output_format == Some(OutputFormat::Human);

    // Data dir: --data-dir flag > CADENCE_DATA_DIR env (via clap) > platform default
    let data_dir = match resolve_data_dir(cli.data_dir) {
        Ok(dir) => dir,
        Err(e) => {
            report_error(&e, human);
            process::exit(1);
        }
    };

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &data_dir, config, human);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    // Logging failures never fail the command itself
    action_log::log_action(&data_dir, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        report_error(&e, human);
        process::exit(1);
    }
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => storage::resolve_data_dir(),
    }
}

fn report_error(error: &Error, human: bool) {
    if human {
        eprintln!("Error: {}", error);
    } else {
        eprintln!(
            "{}",
            serde_json::json!({ "error": error.to_string() })
        );
    }
}

fn parse_opt_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    value.as_deref().map(commands::parse_date).transpose()
}

fn parse_status(value: &str) -> Result<WorkStatus> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Invalid status: {}", value)))
}

fn parse_opt_status(value: Option<String>) -> Result<Option<WorkStatus>> {
    value.as_deref().map(parse_status).transpose()
}

fn run_command(
    command: Commands,
    data_dir: &std::path::Path,
    mut config: CadenceConfig,
    human: bool,
) -> Result<()> {
    // Config commands operate on the config file alone, before storage opens
    let command = match command {
        Commands::Config { command } => {
            match command {
                ConfigCommands::Get { key } => {
                    output(&commands::config_get(&config, &key)?, human);
                }
                ConfigCommands::Set { key, value } => {
                    let path = config::config_path().ok_or_else(|| {
                        Error::Other("Could not determine config directory".to_string())
                    })?;
                    output(&commands::config_set(&mut config, &path, &key, &value)?, human);
                }
                ConfigCommands::List => {
                    output(&commands::config_list(&config)?, human);
                }
            }
            return Ok(());
        }
        other => other,
    };

    let storage = Storage::open(data_dir, config.backend_type())?;

    match command {
        Commands::Config { .. } => unreachable!("handled above"),

        Commands::Cycle { command } => match command {
            CycleCommands::Create { name, parent } => {
                let parent = parent.or_else(|| config.default_parent_dir.clone());
                let result = commands::cycle_create(&storage, &name, parent.as_deref())?;
                output(&result, human);
            }
            CycleCommands::Import { folder } => {
                output(&commands::cycle_import(&storage, &folder)?, human);
            }
            CycleCommands::Select { id } => {
                output(&commands::cycle_select(&storage, &id)?, human);
            }
            CycleCommands::List => {
                output(&commands::cycle_list(&storage)?, human);
            }
        },

        Commands::Goal { command } => match command {
            GoalCommands::Add { title, start, end } => {
                let start = parse_opt_date(start)?;
                let end = parse_opt_date(end)?;
                output(&commands::goal_add(&storage, &title, start, end)?, human);
            }
            GoalCommands::List { hide_done } => {
                output(&commands::goal_list(&storage, hide_done)?, human);
            }
            GoalCommands::Rm { id } => {
                output(&commands::goal_rm(&storage, &id)?, human);
            }
        },

        Commands::Work { command } => match command {
            WorkCommands::Add {
                title,
                goal,
                status,
                start,
                end,
                body,
            } => {
                let status = parse_opt_status(status)?;
                let start = parse_opt_date(start)?;
                let end = parse_opt_date(end)?;
                let result =
                    commands::work_add(&storage, &title, goal, status, start, end, body)?;
                output(&result, human);
            }
            WorkCommands::List { goal } => {
                output(&commands::work_list(&storage, goal.as_deref())?, human);
            }
            WorkCommands::Status { id, status } => {
                let status = parse_status(&status)?;
                output(&commands::work_status(&storage, &id, status)?, human);
            }
            WorkCommands::Update {
                id,
                title,
                status,
                start,
                end,
                body,
            } => {
                let status = parse_opt_status(status)?;
                let start = parse_opt_date(start)?;
                let end = parse_opt_date(end)?;
                let result =
                    commands::work_update(&storage, &id, title, status, start, end, body)?;
                output(&result, human);
            }
            WorkCommands::Rm { id } => {
                output(&commands::work_rm(&storage, &id)?, human);
            }
        },

        Commands::Task { command } => match command {
            TaskCommands::Add { title, work, due } => {
                let due = parse_opt_date(due)?;
                output(&commands::task_add(&storage, &title, &work, due)?, human);
            }
            TaskCommands::List { work } => {
                output(&commands::task_list(&storage, work.as_deref())?, human);
            }
            TaskCommands::Toggle { id } => {
                output(&commands::task_toggle(&storage, &id)?, human);
            }
            TaskCommands::Update { id, title, due } => {
                let due = parse_opt_date(due)?;
                output(&commands::task_update(&storage, &id, title, due)?, human);
            }
            TaskCommands::Rm { id } => {
                output(&commands::task_rm(&storage, &id)?, human);
            }
        },

        Commands::Todo { all } => {
            let today = commands::local_today();
            output(&commands::todo(&storage, today, all)?, human);
        }

        Commands::Calendar { month } => {
            let (year, month) = match month {
                Some(m) => commands::parse_month(&m)?,
                None => commands::current_month(),
            };
            output(&commands::calendar(&storage, year, month)?, human);
        }

        Commands::Log { limit } => {
            output(&commands::log_show(data_dir, limit)?, human);
        }

        Commands::System { command } => match command {
            SystemCommands::Info => {
                let result = commands::system_info(
                    &storage,
                    env!("CARGO_PKG_VERSION"),
                    env!("CADENCE_BUILD_TIMESTAMP"),
                    env!("CADENCE_GIT_COMMIT"),
                )?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    match command {
        Commands::Cycle { command } => match command {
            CycleCommands::Create { name, parent } => (
                "cycle.create".to_string(),
                serde_json::json!({ "name": name, "parent": parent }),
            ),
            CycleCommands::Import { folder } => (
                "cycle.import".to_string(),
                serde_json::json!({ "folder": folder }),
            ),
            CycleCommands::Select { id } => {
                ("cycle.select".to_string(), serde_json::json!({ "id": id }))
            }
            CycleCommands::List => ("cycle.list".to_string(), serde_json::json!({})),
        },

        Commands::Goal { command } => match command {
            GoalCommands::Add { title, start, end } => (
                "goal.add".to_string(),
                serde_json::json!({ "title": title, "start": start, "end": end }),
            ),
            GoalCommands::List { hide_done } => (
                "goal.list".to_string(),
                serde_json::json!({ "hide_done": hide_done }),
            ),
            GoalCommands::Rm { id } => ("goal.rm".to_string(), serde_json::json!({ "id": id })),
        },

        Commands::Work { command } => match command {
            WorkCommands::Add {
                title,
                goal,
                status,
                start,
                end,
                body,
            } => (
                "work.add".to_string(),
                serde_json::json!({ "title": title, "goal": goal, "status": status, "start": start, "end": end, "body": body }),
            ),
            WorkCommands::List { goal } => (
                "work.list".to_string(),
                serde_json::json!({ "goal": goal }),
            ),
            WorkCommands::Status { id, status } => (
                "work.status".to_string(),
                serde_json::json!({ "id": id, "status": status }),
            ),
            WorkCommands::Update {
                id,
                title,
                status,
                start,
                end,
                body,
            } => (
                "work.update".to_string(),
                serde_json::json!({ "id": id, "title": title, "status": status, "start": start, "end": end, "body": body }),
            ),
            WorkCommands::Rm { id } => ("work.rm".to_string(), serde_json::json!({ "id": id })),
        },

        Commands::Task { command } => match command {
            TaskCommands::Add { title, work, due } => (
                "task.add".to_string(),
                serde_json::json!({ "title": title, "work": work, "due": due }),
            ),
            TaskCommands::List { work } => (
                "task.list".to_string(),
                serde_json::json!({ "work": work }),
            ),
            TaskCommands::Toggle { id } => {
                ("task.toggle".to_string(), serde_json::json!({ "id": id }))
            }
            TaskCommands::Update { id, title, due } => (
                "task.update".to_string(),
                serde_json::json!({ "id": id, "title": title, "due": due }),
            ),
            TaskCommands::Rm { id } => ("task.rm".to_string(), serde_json::json!({ "id": id })),
        },

        Commands::Todo { all } => ("todo".to_string(), serde_json::json!({ "all": all })),

        Commands::Calendar { month } => (
            "calendar".to_string(),
            serde_json::json!({ "month": month }),
        ),

        Commands::Log { limit } => ("log".to_string(), serde_json::json!({ "limit": limit })),

        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => {
                ("config.get".to_string(), serde_json::json!({ "key": key }))
            }
            ConfigCommands::Set { key, value } => (
                "config.set".to_string(),
                serde_json::json!({ "key": key, "value": value }),
            ),
            ConfigCommands::List => ("config.list".to_string(), serde_json::json!({})),
        },

        Commands::System { command } => match command {
            SystemCommands::Info => ("system.info".to_string(), serde_json::json!({})),
        },
    }
}
