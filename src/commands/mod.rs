//! Command implementations for the Cadence CLI.
//!
//! Each command loads state through [`Storage`], applies document
//! mutations from the models layer, and returns a result type that can be
//! rendered as JSON (default) or human-readable text via the [`Output`]
//! trait. Goal/Work/Task commands operate on the currently selected cycle.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::path::Path;

use crate::action_log::{self, ActionLog};
use crate::config::{CadenceConfig, CONFIG_KEYS};
use crate::models::agenda::{self, CalendarItem, TodoGroup, TODO_WINDOW_DAYS};
use crate::models::{
    compute_goal_progress, compute_goal_status, is_completed_goal, AppIndex, CycleData, CycleMeta,
    Goal, GoalStatus, Task, Work, WorkStatus,
};
use crate::storage::Storage;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to a JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date (expected YYYY-MM-DD): {}", s)))
}

/// Parse a `YYYY-MM` month argument into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidInput(format!("Invalid month (expected YYYY-MM): {}", s));
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

// === Cycle commands ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleCreated {
    pub cycle: CycleMeta,
    pub index: AppIndex,
}

impl Output for CycleCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let location = self
            .cycle
            .folder_path
            .as_deref()
            .unwrap_or("flat storage");
        format!(
            "Created cycle {} \"{}\" at {}",
            self.cycle.id, self.cycle.name, location
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleImported {
    pub cycle: CycleMeta,
    pub index: AppIndex,
}

impl Output for CycleImported {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Imported cycle {} \"{}\" (now selected)",
            self.cycle.id, self.cycle.name
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSelected {
    pub selected_cycle_id: String,
}

impl Output for CycleSelected {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Selected cycle {}", self.selected_cycle_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleList {
    pub cycles: Vec<CycleMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_cycle_id: Option<String>,
}

impl Output for CycleList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.cycles.is_empty() {
            return "No cycles yet. Create one with `cad cycle create <name>`.".to_string();
        }
        let mut lines = Vec::new();
        for cycle in &self.cycles {
            let marker = if self.selected_cycle_id.as_deref() == Some(cycle.id.as_str()) {
                "*"
            } else {
                " "
            };
            let location = cycle.folder_path.as_deref().unwrap_or("flat storage");
            lines.push(format!(
                "{} {}  {}  ({})",
                marker, cycle.id, cycle.name, location
            ));
        }
        lines.join("\n")
    }
}

pub fn cycle_create(storage: &Storage, name: &str, parent: Option<&Path>) -> Result<CycleCreated> {
    let index = storage.create_cycle(name, parent)?;
    let cycle = index
        .cycles
        .last()
        .cloned()
        .ok_or_else(|| Error::Other("Cycle was not registered".to_string()))?;
    Ok(CycleCreated { cycle, index })
}

pub fn cycle_import(storage: &Storage, folder: &Path) -> Result<CycleImported> {
    let index = storage.import_cycle(folder)?;
    let cycle = index
        .selected_cycle()
        .cloned()
        .ok_or_else(|| Error::Other("Imported cycle was not registered".to_string()))?;
    Ok(CycleImported { cycle, index })
}

pub fn cycle_select(storage: &Storage, cycle_id: &str) -> Result<CycleSelected> {
    let index = storage.select_cycle(cycle_id)?;
    Ok(CycleSelected {
        selected_cycle_id: index
            .selected_cycle_id
            .unwrap_or_else(|| cycle_id.to_string()),
    })
}

pub fn cycle_list(storage: &Storage) -> Result<CycleList> {
    let index = storage.load_index()?;
    Ok(CycleList {
        cycles: index.cycles,
        selected_cycle_id: index.selected_cycle_id,
    })
}

/// Load the selected cycle's document, apply a mutation, and save.
fn mutate_selected<T>(
    storage: &Storage,
    apply: impl FnOnce(&mut CycleData) -> Result<T>,
) -> Result<T> {
    let meta = storage.selected_cycle()?;
    let mut data = storage.load_cycle_data(&meta.id)?;
    let result = apply(&mut data)?;
    storage.save_cycle_data(&meta.id, &data)?;
    Ok(result)
}

fn load_selected(storage: &Storage) -> Result<CycleData> {
    let meta = storage.selected_cycle()?;
    storage.load_cycle_data(&meta.id)
}

// === Goal commands ===

/// A goal with its derived status and progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEntry {
    #[serde(flatten)]
    pub goal: Goal,
    pub status: GoalStatus,
    pub progress: u8,
    pub work_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreated {
    pub goal: Goal,
}

impl Output for GoalCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Created goal {} \"{}\"", self.goal.id, self.goal.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalList {
    pub goals: Vec<GoalEntry>,
}

impl Output for GoalList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.goals.is_empty() {
            return "No goals.".to_string();
        }
        self.goals
            .iter()
            .map(|entry| {
                format!(
                    "{}  {}  [{}] {}% ({} works)  {} .. {}",
                    entry.goal.id,
                    entry.goal.title,
                    entry.status.label(),
                    entry.progress,
                    entry.work_count,
                    fmt_date(entry.goal.start_date),
                    fmt_date(entry.goal.end_date),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRemoved {
    pub goal: Goal,
    pub works_removed: usize,
    pub tasks_removed: usize,
}

impl Output for GoalRemoved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Removed goal {} \"{}\" ({} works, {} tasks)",
            self.goal.id, self.goal.title, self.works_removed, self.tasks_removed
        )
    }
}

pub fn goal_add(
    storage: &Storage,
    title: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<GoalCreated> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Goal title must not be empty".to_string()));
    }
    let goal = mutate_selected(storage, |data| {
        Ok(data.add_goal(title.to_string(), start_date, end_date).clone())
    })?;
    Ok(GoalCreated { goal })
}

pub fn goal_list(storage: &Storage, hide_done: bool) -> Result<GoalList> {
    let data = load_selected(storage)?;
    let goals = data
        .goals
        .iter()
        .filter_map(|goal| {
            let works = data.works_for_goal(&goal.id);
            if hide_done && is_completed_goal(&works) {
                return None;
            }
            Some(GoalEntry {
                goal: goal.clone(),
                status: compute_goal_status(&works),
                progress: compute_goal_progress(&works),
                work_count: works.len(),
            })
        })
        .collect();
    Ok(GoalList { goals })
}

pub fn goal_rm(storage: &Storage, goal_id: &str) -> Result<GoalRemoved> {
    mutate_selected(storage, |data| {
        let works_before = data.works.len();
        let tasks_before = data.tasks.len();
        let goal = data.remove_goal(goal_id)?;
        Ok(GoalRemoved {
            goal,
            works_removed: works_before - data.works.len(),
            tasks_removed: tasks_before - data.tasks.len(),
        })
    })
}

// === Work commands ===

/// A work with its task tallies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    #[serde(flatten)]
    pub work: Work,
    pub task_count: usize,
    pub done_task_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCreated {
    pub work: Work,
}

impl Output for WorkCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Created work {} \"{}\"", self.work.id, self.work.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkUpdated {
    pub work: Work,
}

impl Output for WorkUpdated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Updated work {} \"{}\" [{}]",
            self.work.id,
            self.work.title,
            self.work.status.label()
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRemoved {
    pub work: Work,
    pub tasks_removed: usize,
}

impl Output for WorkRemoved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Removed work {} \"{}\" ({} tasks)",
            self.work.id, self.work.title, self.tasks_removed
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkList {
    pub works: Vec<WorkEntry>,
}

impl Output for WorkList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.works.is_empty() {
            return "No works.".to_string();
        }
        self.works
            .iter()
            .map(|entry| {
                let goal = entry.work.goal_id.as_deref().unwrap_or("-");
                format!(
                    "{}  {}  [{}]  goal: {}  tasks: {}/{}",
                    entry.work.id,
                    entry.work.title,
                    entry.work.status.label(),
                    goal,
                    entry.done_task_count,
                    entry.task_count,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[allow(clippy::too_many_arguments)]
pub fn work_add(
    storage: &Storage,
    title: &str,
    goal_id: Option<String>,
    status: Option<WorkStatus>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    body: Option<String>,
) -> Result<WorkCreated> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Work title must not be empty".to_string()));
    }
    let work = mutate_selected(storage, |data| {
        Ok(data
            .add_work(
                title.to_string(),
                goal_id,
                status.unwrap_or_default(),
                start_date,
                end_date,
                body,
            )?
            .clone())
    })?;
    Ok(WorkCreated { work })
}

pub fn work_list(storage: &Storage, goal_id: Option<&str>) -> Result<WorkList> {
    let data = load_selected(storage)?;
    if let Some(gid) = goal_id {
        if data.goal(gid).is_none() {
            return Err(Error::NotFound(format!("goal {}", gid)));
        }
    }
    let works = data
        .works
        .iter()
        .filter(|work| goal_id.is_none() || work.goal_id.as_deref() == goal_id)
        .map(|work| {
            let tasks = data.tasks_for_work(&work.id);
            WorkEntry {
                work: work.clone(),
                task_count: tasks.len(),
                done_task_count: tasks.iter().filter(|t| t.done).count(),
            }
        })
        .collect();
    Ok(WorkList { works })
}

pub fn work_status(storage: &Storage, work_id: &str, status: WorkStatus) -> Result<WorkUpdated> {
    let work = mutate_selected(storage, |data| {
        Ok(data.set_work_status(work_id, status)?.clone())
    })?;
    Ok(WorkUpdated { work })
}

#[allow(clippy::too_many_arguments)]
pub fn work_update(
    storage: &Storage,
    work_id: &str,
    title: Option<String>,
    status: Option<WorkStatus>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    body: Option<String>,
) -> Result<WorkUpdated> {
    let work = mutate_selected(storage, |data| {
        Ok(data
            .update_work(work_id, title, status, start_date, end_date, body)?
            .clone())
    })?;
    Ok(WorkUpdated { work })
}

pub fn work_rm(storage: &Storage, work_id: &str) -> Result<WorkRemoved> {
    mutate_selected(storage, |data| {
        let tasks_before = data.tasks.len();
        let work = data.remove_work(work_id)?;
        Ok(WorkRemoved {
            work,
            tasks_removed: tasks_before - data.tasks.len(),
        })
    })
}

// === Task commands ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub task: Task,
}

impl Output for TaskCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Created task {} \"{}\"", self.task.id, self.task.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdated {
    pub task: Task,
}

impl Output for TaskUpdated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mark = if self.task.done { "x" } else { " " };
        format!("[{}] {} \"{}\"", mark, self.task.id, self.task.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRemoved {
    pub task: Task,
}

impl Output for TaskRemoved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Removed task {} \"{}\"", self.task.id, self.task.title)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

impl Output for TaskList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks.".to_string();
        }
        self.tasks
            .iter()
            .map(|task| {
                let mark = if task.done { "x" } else { " " };
                format!(
                    "[{}] {}  {}  due: {}",
                    mark,
                    task.id,
                    task.title,
                    fmt_date(task.due_date)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn task_add(
    storage: &Storage,
    title: &str,
    work_id: &str,
    due_date: Option<NaiveDate>,
) -> Result<TaskCreated> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Task title must not be empty".to_string()));
    }
    let task = mutate_selected(storage, |data| {
        Ok(data
            .add_task(title.to_string(), work_id.to_string(), due_date)?
            .clone())
    })?;
    Ok(TaskCreated { task })
}

pub fn task_list(storage: &Storage, work_id: Option<&str>) -> Result<TaskList> {
    let data = load_selected(storage)?;
    if let Some(wid) = work_id {
        if data.work(wid).is_none() {
            return Err(Error::NotFound(format!("work {}", wid)));
        }
    }
    let tasks = data
        .tasks
        .iter()
        .filter(|task| work_id.is_none() || Some(task.work_id.as_str()) == work_id)
        .cloned()
        .collect();
    Ok(TaskList { tasks })
}

pub fn task_toggle(storage: &Storage, task_id: &str) -> Result<TaskUpdated> {
    let task = mutate_selected(storage, |data| Ok(data.toggle_task(task_id)?.clone()))?;
    Ok(TaskUpdated { task })
}

pub fn task_update(
    storage: &Storage,
    task_id: &str,
    title: Option<String>,
    due_date: Option<NaiveDate>,
) -> Result<TaskUpdated> {
    let task = mutate_selected(storage, |data| {
        Ok(data.update_task(task_id, title, due_date)?.clone())
    })?;
    Ok(TaskUpdated { task })
}

pub fn task_rm(storage: &Storage, task_id: &str) -> Result<TaskRemoved> {
    let task = mutate_selected(storage, |data| data.remove_task(task_id))?;
    Ok(TaskRemoved { task })
}

// === Agenda commands ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResult {
    pub window_days: i64,
    pub count: usize,
    pub groups: Vec<TodoGroup>,
}

impl Output for TodoResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.count == 0 {
            return format!(
                "No tasks are due within the next {} days.",
                self.window_days
            );
        }
        let mut lines = vec![format!(
            "Tasks due in the next {} days: {}",
            self.window_days, self.count
        )];
        for group in &self.groups {
            lines.push(format!("{} ({})", group.work_title, group.tasks.len()));
            for task in &group.tasks {
                let mark = if task.done { "x" } else { " " };
                lines.push(format!(
                    "  [{}] {}  due: {}",
                    mark,
                    task.title,
                    fmt_date(task.due_date)
                ));
            }
        }
        lines.join("\n")
    }
}

pub fn todo(storage: &Storage, today: NaiveDate, include_done: bool) -> Result<TodoResult> {
    let data = load_selected(storage)?;
    let groups = agenda::todo_groups(&data, today, include_done);
    let count = groups.iter().map(|g| g.tasks.len()).sum();
    Ok(TodoResult {
        window_days: TODO_WINDOW_DAYS,
        count,
        groups,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub items: Vec<CalendarItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResult {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl Output for CalendarResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{}-{:02}", self.year, self.month)];
        if self.days.is_empty() {
            lines.push("No dated items this month.".to_string());
        }
        for day in &self.days {
            lines.push(format!("{}", day.date));
            for item in &day.items {
                let mark = if item.completed { "x" } else { " " };
                lines.push(format!("  [{}] {}", mark, item.label));
            }
        }
        lines.join("\n")
    }
}

pub fn calendar(storage: &Storage, year: i32, month: u32) -> Result<CalendarResult> {
    let data = load_selected(storage)?;
    let days = agenda::month_items(&data, year, month)
        .into_iter()
        .map(|(date, items)| CalendarDay { date, items })
        .collect();
    Ok(CalendarResult { year, month, days })
}

/// Today according to the local clock. Due dates are calendar dates the
/// user typed, so the windows anchor on local time, not UTC.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current local month, used when `--month` is omitted.
pub fn current_month() -> (i32, u32) {
    let now = local_today();
    (now.year(), now.month())
}

// === Log command ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResult {
    pub entries: Vec<ActionLog>,
}

impl Output for LogResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No logged actions.".to_string();
        }
        self.entries
            .iter()
            .map(|entry| {
                let status = if entry.success { "ok" } else { "err" };
                format!(
                    "{}  {:3}  {}ms  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    status,
                    entry.duration_ms,
                    entry.command
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn log_show(data_dir: &Path, limit: usize) -> Result<LogResult> {
    Ok(LogResult {
        entries: action_log::read_log(data_dir, limit),
    })
}

// === Config commands ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValue {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Output for ConfigValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.key, value),
            None => format!("{} is not set", self.key),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigListResult {
    pub entries: Vec<ConfigValue>,
}

impl Output for ConfigListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_human())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn config_get(config: &CadenceConfig, key: &str) -> Result<ConfigValue> {
    Ok(ConfigValue {
        key: key.to_string(),
        value: config.get(key)?,
    })
}

pub fn config_set(
    config: &mut CadenceConfig,
    config_file: &Path,
    key: &str,
    value: &str,
) -> Result<ConfigValue> {
    config.set(key, value)?;
    config.save_to(config_file)?;
    Ok(ConfigValue {
        key: key.to_string(),
        value: config.get(key)?,
    })
}

pub fn config_list(config: &CadenceConfig) -> Result<ConfigListResult> {
    let entries = CONFIG_KEYS
        .iter()
        .map(|key| {
            Ok(ConfigValue {
                key: key.to_string(),
                value: config.get(key)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ConfigListResult { entries })
}

// === System commands ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub version: String,
    pub build_timestamp: String,
    pub git_commit: String,
    pub data_dir: String,
    pub backend: String,
    pub location: String,
    pub cycle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_cycle_id: Option<String>,
}

impl Output for SystemInfo {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "cadence {} ({} {})\ndata dir: {}\nbackend:  {} - {}\ncycles:   {} (selected: {})",
            self.version,
            self.git_commit,
            self.build_timestamp,
            self.data_dir,
            self.backend,
            self.location,
            self.cycle_count,
            self.selected_cycle_id.as_deref().unwrap_or("none"),
        )
    }
}

pub fn system_info(
    storage: &Storage,
    version: &str,
    build_timestamp: &str,
    git_commit: &str,
) -> Result<SystemInfo> {
    let index = storage.load_index()?;
    Ok(SystemInfo {
        version: version.to_string(),
        build_timestamp: build_timestamp.to_string(),
        git_commit: git_commit.to_string(),
        data_dir: storage.data_dir().display().to_string(),
        backend: storage.backend_type().to_string(),
        location: storage.location(),
        cycle_count: index.cycles.len(),
        selected_cycle_id: index.selected_cycle_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    fn env_with_cycle() -> (TestEnv, Storage) {
        let env = TestEnv::new();
        let storage = env.storage();
        storage
            .create_cycle("Sprint", Some(env.parent_path()))
            .unwrap();
        (env, storage)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-08-26").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
        );
        assert!(parse_date("26/08/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-08").unwrap(), (2026, 8));
        assert!(parse_month("2026").is_err());
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("08-2026").is_err());
    }

    #[test]
    fn test_goal_commands_require_selected_cycle() {
        let env = TestEnv::new();
        let storage = env.storage();
        assert!(matches!(
            goal_add(&storage, "G", None, None),
            Err(Error::NoCycleSelected)
        ));
        assert!(matches!(
            todo(&storage, local_today(), false),
            Err(Error::NoCycleSelected)
        ));
    }

    #[test]
    fn test_goal_lifecycle() {
        let (_env, storage) = env_with_cycle();

        let created = goal_add(&storage, "Ship v1", None, None).unwrap();
        let work = work_add(
            &storage,
            "Implement",
            Some(created.goal.id.clone()),
            None,
            None,
            None,
            None,
        )
        .unwrap();
        task_add(&storage, "Write tests", &work.work.id, None).unwrap();

        let list = goal_list(&storage, false).unwrap();
        assert_eq!(list.goals.len(), 1);
        assert_eq!(list.goals[0].status, GoalStatus::NotStarted);
        assert_eq!(list.goals[0].work_count, 1);

        work_status(&storage, &work.work.id, WorkStatus::Done).unwrap();
        let list = goal_list(&storage, false).unwrap();
        assert_eq!(list.goals[0].status, GoalStatus::Done);
        assert_eq!(list.goals[0].progress, 100);

        // completed goals drop out with hide_done
        assert!(goal_list(&storage, true).unwrap().goals.is_empty());

        let removed = goal_rm(&storage, &created.goal.id).unwrap();
        assert_eq!(removed.works_removed, 1);
        assert_eq!(removed.tasks_removed, 1);
        assert!(task_list(&storage, None).unwrap().tasks.is_empty());
    }

    #[test]
    fn test_work_update_and_rm() {
        let (_env, storage) = env_with_cycle();
        let work = work_add(&storage, "Draft", None, None, None, None, None).unwrap();
        task_add(&storage, "t1", &work.work.id, None).unwrap();
        task_add(&storage, "t2", &work.work.id, None).unwrap();

        let updated = work_update(
            &storage,
            &work.work.id,
            Some("Draft v2".to_string()),
            Some(WorkStatus::InProgress),
            None,
            None,
            Some("<p>body</p>".to_string()),
        )
        .unwrap();
        assert_eq!(updated.work.title, "Draft v2");
        assert_eq!(updated.work.status, WorkStatus::InProgress);
        assert_eq!(updated.work.body.as_deref(), Some("<p>body</p>"));

        let removed = work_rm(&storage, &work.work.id).unwrap();
        assert_eq!(removed.tasks_removed, 2);
        assert!(work_list(&storage, None).unwrap().works.is_empty());
    }

    #[test]
    fn test_task_toggle_persists() {
        let (_env, storage) = env_with_cycle();
        let work = work_add(&storage, "W", None, None, None, None, None).unwrap();
        let task = task_add(&storage, "T", &work.work.id, None).unwrap();

        assert!(task_toggle(&storage, &task.task.id).unwrap().task.done);
        let list = task_list(&storage, Some(&work.work.id)).unwrap();
        assert!(list.tasks[0].done);
    }

    #[test]
    fn test_todo_and_calendar() {
        let (_env, storage) = env_with_cycle();
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let work = work_add(&storage, "W", None, None, None, None, None).unwrap();
        task_add(&storage, "due soon", &work.work.id, Some(today)).unwrap();
        task_add(&storage, "undated", &work.work.id, None).unwrap();

        let todo_result = todo(&storage, today, false).unwrap();
        assert_eq!(todo_result.count, 1);
        assert_eq!(todo_result.groups[0].work_title, "W");

        let cal = calendar(&storage, 2026, 8).unwrap();
        assert_eq!(cal.days.len(), 1);
        assert_eq!(cal.days[0].items[0].label, "[Task] due soon Due");
    }

    #[test]
    fn test_work_list_filter_by_goal() {
        let (_env, storage) = env_with_cycle();
        let goal = goal_add(&storage, "G", None, None).unwrap();
        work_add(&storage, "attached", Some(goal.goal.id.clone()), None, None, None, None).unwrap();
        work_add(&storage, "free", None, None, None, None, None).unwrap();

        let all = work_list(&storage, None).unwrap();
        assert_eq!(all.works.len(), 2);

        let filtered = work_list(&storage, Some(&goal.goal.id)).unwrap();
        assert_eq!(filtered.works.len(), 1);
        assert_eq!(filtered.works[0].work.title, "attached");

        assert!(matches!(
            work_list(&storage, Some("goal_missing")),
            Err(Error::NotFound(_))
        ));
    }
}
