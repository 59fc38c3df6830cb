//! Data models for Cadence entities.
//!
//! This module defines the core data structures:
//! - `CycleMeta` / `AppIndex` - the global registry of planning cycles
//! - `CycleData` - the per-cycle JSON document (goals, works, tasks)
//! - `Goal` - top-level objective with derived status
//! - `Work` - a unit of work under a Goal (or independent), with explicit status
//! - `Task` - a checkbox-style to-do item under a Work
//!
//! All persisted documents use camelCase field names so that documents
//! written by other frontends of the same format stay readable.

pub mod agenda;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Explicit status of a Work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

/// Derived status of a Goal, computed from its child Works.
///
/// Never stored in the document; always recomputed on load/display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl WorkStatus {
    /// Human-readable label for display output.
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::NotStarted => "Not started",
            WorkStatus::InProgress => "In progress",
            WorkStatus::Done => "Done",
        }
    }
}

impl GoalStatus {
    /// Human-readable label for display output.
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not started",
            GoalStatus::InProgress => "In progress",
            GoalStatus::Done => "Done",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkStatus::NotStarted => "NOT_STARTED",
            WorkStatus::InProgress => "IN_PROGRESS",
            WorkStatus::Done => "DONE",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalStatus::NotStarted => "NOT_STARTED",
            GoalStatus::InProgress => "IN_PROGRESS",
            GoalStatus::Done => "DONE",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "not_started" | "notstarted" => Ok(WorkStatus::NotStarted),
            "in_progress" | "inprogress" => Ok(WorkStatus::InProgress),
            "done" => Ok(WorkStatus::Done),
            _ => Err(format!("Unknown work status: {}", s)),
        }
    }
}

/// A top-level objective inside a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Unique identifier (e.g., "goal_a1b2...")
    pub id: String,

    /// Owning cycle ID
    pub cycle_id: String,

    /// Goal title
    pub title: String,

    /// Planned start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Planned end date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// A unit of work, optionally attached to a Goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    /// Unique identifier (e.g., "work_a1b2...")
    pub id: String,

    /// Owning cycle ID
    pub cycle_id: String,

    /// Parent goal ID; independent work when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,

    /// Work title
    pub title: String,

    /// Explicit status
    #[serde(default)]
    pub status: WorkStatus,

    /// Planned start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Planned end date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Raw opaque markup; never interpreted by this crate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A checkbox-style to-do item under a Work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (e.g., "task_a1b2...")
    pub id: String,

    /// Owning cycle ID
    pub cycle_id: String,

    /// Parent work ID (required)
    pub work_id: String,

    /// Task title
    pub title: String,

    /// Completion flag, independent of the parent Work's status
    #[serde(default)]
    pub done: bool,

    /// Optional due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Registry entry for a known cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleMeta {
    /// Unique identifier (e.g., "cycle_a1b2...")
    pub id: String,

    /// Cycle display name
    pub name: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Storage folder for this cycle; absent when stored in the flat kv store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
}

/// The single global index document: ordered cycles plus the selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIndex {
    #[serde(default)]
    pub cycles: Vec<CycleMeta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_cycle_id: Option<String>,
}

impl AppIndex {
    /// Find a cycle entry by ID.
    pub fn find_cycle(&self, cycle_id: &str) -> Option<&CycleMeta> {
        self.cycles.iter().find(|c| c.id == cycle_id)
    }

    /// The currently selected cycle entry, if any.
    pub fn selected_cycle(&self) -> Option<&CycleMeta> {
        self.selected_cycle_id
            .as_deref()
            .and_then(|id| self.find_cycle(id))
    }
}

/// The per-cycle document persisted as `cycle_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleData {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Backfilled with "now" when the source document lacks one
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub goals: Vec<Goal>,

    #[serde(default)]
    pub works: Vec<Work>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl CycleData {
    /// Create an empty document for a new cycle.
    pub fn empty(id: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
            goals: Vec::new(),
            works: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Force the owning cycle ID onto the document and every contained
    /// goal, work, and task. Imported documents may carry stale ids.
    pub fn normalize(&mut self, cycle_id: &str) {
        self.id = cycle_id.to_string();
        for goal in &mut self.goals {
            goal.cycle_id = cycle_id.to_string();
        }
        for work in &mut self.works {
            work.cycle_id = cycle_id.to_string();
        }
        for task in &mut self.tasks {
            task.cycle_id = cycle_id.to_string();
        }
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn work(&self, work_id: &str) -> Option<&Work> {
        self.works.iter().find(|w| w.id == work_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Works attached to the given goal, in document order.
    pub fn works_for_goal(&self, goal_id: &str) -> Vec<&Work> {
        self.works
            .iter()
            .filter(|w| w.goal_id.as_deref() == Some(goal_id))
            .collect()
    }

    /// Tasks attached to the given work, in document order.
    pub fn tasks_for_work(&self, work_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.work_id == work_id).collect()
    }

    /// Append a new goal and return a reference to it.
    pub fn add_goal(
        &mut self,
        title: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> &Goal {
        let goal = Goal {
            id: uid("goal"),
            cycle_id: self.id.clone(),
            title,
            start_date,
            end_date,
        };
        self.goals.push(goal);
        &self.goals[self.goals.len() - 1]
    }

    /// Append a new work and return a reference to it.
    pub fn add_work(
        &mut self,
        title: String,
        goal_id: Option<String>,
        status: WorkStatus,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        body: Option<String>,
    ) -> crate::Result<&Work> {
        if let Some(gid) = goal_id.as_deref() {
            if self.goal(gid).is_none() {
                return Err(crate::Error::NotFound(format!("goal {}", gid)));
            }
        }
        let work = Work {
            id: uid("work"),
            cycle_id: self.id.clone(),
            goal_id,
            title,
            status,
            start_date,
            end_date,
            body,
        };
        self.works.push(work);
        Ok(&self.works[self.works.len() - 1])
    }

    /// Append a new task under an existing work and return a reference to it.
    pub fn add_task(
        &mut self,
        title: String,
        work_id: String,
        due_date: Option<NaiveDate>,
    ) -> crate::Result<&Task> {
        if self.work(&work_id).is_none() {
            return Err(crate::Error::NotFound(format!("work {}", work_id)));
        }
        let task = Task {
            id: uid("task"),
            cycle_id: self.id.clone(),
            work_id,
            title,
            done: false,
            due_date,
        };
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Set the explicit status of a work.
    pub fn set_work_status(&mut self, work_id: &str, status: WorkStatus) -> crate::Result<&Work> {
        let work = self
            .works
            .iter_mut()
            .find(|w| w.id == work_id)
            .ok_or_else(|| crate::Error::NotFound(format!("work {}", work_id)))?;
        work.status = status;
        Ok(work)
    }

    /// Patch mutable fields of a work. `None` fields are left untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn update_work(
        &mut self,
        work_id: &str,
        title: Option<String>,
        status: Option<WorkStatus>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        body: Option<String>,
    ) -> crate::Result<&Work> {
        let work = self
            .works
            .iter_mut()
            .find(|w| w.id == work_id)
            .ok_or_else(|| crate::Error::NotFound(format!("work {}", work_id)))?;
        if let Some(title) = title {
            work.title = title;
        }
        if let Some(status) = status {
            work.status = status;
        }
        if let Some(start) = start_date {
            work.start_date = Some(start);
        }
        if let Some(end) = end_date {
            work.end_date = Some(end);
        }
        if let Some(body) = body {
            work.body = Some(body);
        }
        Ok(work)
    }

    /// Flip the completion flag of a task.
    pub fn toggle_task(&mut self, task_id: &str) -> crate::Result<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| crate::Error::NotFound(format!("task {}", task_id)))?;
        task.done = !task.done;
        Ok(task)
    }

    /// Patch mutable fields of a task. `None` fields are left untouched.
    pub fn update_task(
        &mut self,
        task_id: &str,
        title: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> crate::Result<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| crate::Error::NotFound(format!("task {}", task_id)))?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(due) = due_date {
            task.due_date = Some(due);
        }
        Ok(task)
    }

    /// Remove a single task.
    pub fn remove_task(&mut self, task_id: &str) -> crate::Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| crate::Error::NotFound(format!("task {}", task_id)))?;
        Ok(self.tasks.remove(pos))
    }

    /// Remove a work and cascade to all tasks under it.
    pub fn remove_work(&mut self, work_id: &str) -> crate::Result<Work> {
        let pos = self
            .works
            .iter()
            .position(|w| w.id == work_id)
            .ok_or_else(|| crate::Error::NotFound(format!("work {}", work_id)))?;
        let work = self.works.remove(pos);
        self.tasks.retain(|t| t.work_id != work_id);
        Ok(work)
    }

    /// Remove a goal, its works, and all tasks under those works.
    ///
    /// Independent works (no goalId) are never touched.
    pub fn remove_goal(&mut self, goal_id: &str) -> crate::Result<Goal> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| crate::Error::NotFound(format!("goal {}", goal_id)))?;
        let goal = self.goals.remove(pos);

        let child_work_ids: Vec<String> = self
            .works
            .iter()
            .filter(|w| w.goal_id.as_deref() == Some(goal_id))
            .map(|w| w.id.clone())
            .collect();

        self.works.retain(|w| w.goal_id.as_deref() != Some(goal_id));
        self.tasks.retain(|t| !child_work_ids.contains(&t.work_id));
        Ok(goal)
    }
}

/// Generate a prefixed unique ID (e.g., "goal_67e5504410b1426f9247bb680e5fe0c8").
pub fn uid(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Derived Goal status from its child Works.
///
/// NOT_STARTED when there are no works or all are NOT_STARTED;
/// DONE when non-empty and all works are DONE; IN_PROGRESS otherwise.
pub fn compute_goal_status(works: &[&Work]) -> GoalStatus {
    if works.is_empty() {
        return GoalStatus::NotStarted;
    }
    if works.iter().all(|w| w.status == WorkStatus::NotStarted) {
        return GoalStatus::NotStarted;
    }
    if works.iter().all(|w| w.status == WorkStatus::Done) {
        return GoalStatus::Done;
    }
    GoalStatus::InProgress
}

/// Derived Goal progress: round(100 * done / total), 0 when empty.
pub fn compute_goal_progress(works: &[&Work]) -> u8 {
    if works.is_empty() {
        return 0;
    }
    let done = works.iter().filter(|w| w.status == WorkStatus::Done).count();
    ((done as f64 / works.len() as f64) * 100.0).round() as u8
}

/// True when the goal has at least one work and every work is DONE.
pub fn is_completed_goal(works: &[&Work]) -> bool {
    !works.is_empty() && works.iter().all(|w| w.status == WorkStatus::Done)
}
