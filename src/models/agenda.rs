//! Agenda projections over a cycle document.
//!
//! Two read-only views are derived here:
//! - the todo window: tasks due within the next 30 days, grouped by Work
//! - the calendar: per-day items for a month (goal/work start/end, task due)

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{compute_goal_status, CycleData, GoalStatus, Task, WorkStatus};

/// Inclusive length of the todo lookahead window, in days.
pub const TODO_WINDOW_DAYS: i64 = 30;

/// Pseudo-group title for tasks whose work no longer exists.
pub const UNASSIGNED_WORK_TITLE: &str = "Unassigned Work";

/// Tasks due soon, grouped under their parent Work.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoGroup {
    /// Parent work ID; absent for the unassigned pseudo-group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<String>,

    pub work_title: String,

    pub tasks: Vec<Task>,
}

/// Tasks with a due date inside `[today, today + 30 days]`, sorted by due
/// date ascending. `include_done` keeps finished tasks in the window.
pub fn upcoming_tasks(data: &CycleData, today: NaiveDate, include_done: bool) -> Vec<Task> {
    let limit = today + Duration::days(TODO_WINDOW_DAYS);
    let mut tasks: Vec<Task> = data
        .tasks
        .iter()
        .filter(|task| {
            let Some(due) = task.due_date else {
                return false;
            };
            if due < today || due > limit {
                return false;
            }
            include_done || !task.done
        })
        .cloned()
        .collect();
    tasks.sort_by_key(|t| t.due_date);
    tasks
}

/// Group the upcoming tasks by their parent Work (document order),
/// appending an "Unassigned Work" group for tasks whose work is gone.
pub fn todo_groups(data: &CycleData, today: NaiveDate, include_done: bool) -> Vec<TodoGroup> {
    let upcoming = upcoming_tasks(data, today, include_done);

    let mut groups: Vec<TodoGroup> = data
        .works
        .iter()
        .map(|work| TodoGroup {
            work_id: Some(work.id.clone()),
            work_title: work.title.clone(),
            tasks: upcoming
                .iter()
                .filter(|t| t.work_id == work.id)
                .cloned()
                .collect(),
        })
        .filter(|group| !group.tasks.is_empty())
        .collect();

    let orphans: Vec<Task> = upcoming
        .iter()
        .filter(|t| !data.works.iter().any(|w| w.id == t.work_id))
        .cloned()
        .collect();
    if !orphans.is_empty() {
        groups.push(TodoGroup {
            work_id: None,
            work_title: UNASSIGNED_WORK_TITLE.to_string(),
            tasks: orphans,
        });
    }

    groups
}

/// What kind of entity a calendar item was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarItemKind {
    Goal,
    Work,
    Task,
}

/// A single dated entry on the calendar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub date: NaiveDate,

    /// Display label, e.g. "[Work] Write report Start"
    pub label: String,

    pub completed: bool,

    pub kind: CalendarItemKind,

    /// Set for work items so a caller can drill into the work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<String>,
}

/// Project the document onto a month: per-day lists of goal start/end,
/// work start/end, and task due items, keyed by date in ascending order.
pub fn month_items(
    data: &CycleData,
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Vec<CalendarItem>> {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarItem>> = BTreeMap::new();

    let mut push = |date: NaiveDate, item: CalendarItem| {
        if date.year() == year && date.month() == month {
            days.entry(date).or_default().push(item);
        }
    };

    for goal in &data.goals {
        let status = compute_goal_status(&data.works_for_goal(&goal.id));
        for (date, suffix) in [(goal.start_date, "Start"), (goal.end_date, "End")] {
            if let Some(date) = date {
                push(
                    date,
                    CalendarItem {
                        date,
                        label: format!("[Goal] {} {}", goal.title, suffix),
                        completed: status == GoalStatus::Done,
                        kind: CalendarItemKind::Goal,
                        work_id: None,
                    },
                );
            }
        }
    }

    for work in &data.works {
        for (date, suffix) in [(work.start_date, "Start"), (work.end_date, "End")] {
            if let Some(date) = date {
                push(
                    date,
                    CalendarItem {
                        date,
                        label: format!("[Work] {} {}", work.title, suffix),
                        completed: work.status == WorkStatus::Done,
                        kind: CalendarItemKind::Work,
                        work_id: Some(work.id.clone()),
                    },
                );
            }
        }
    }

    for task in &data.tasks {
        if let Some(date) = task.due_date {
            push(
                date,
                CalendarItem {
                    date,
                    label: format!("[Task] {} Due", task.title),
                    completed: task.done,
                    kind: CalendarItemKind::Task,
                    work_id: None,
                },
            );
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{uid, CycleData, Task, WorkStatus};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data_with_work() -> (CycleData, String) {
        let mut data = CycleData::empty(
            "cycle_test".to_string(),
            "Test".to_string(),
            Utc::now(),
        );
        let work_id = data
            .add_work(
                "Report".to_string(),
                None,
                WorkStatus::InProgress,
                Some(date(2026, 8, 1)),
                Some(date(2026, 8, 31)),
                None,
            )
            .unwrap()
            .id
            .clone();
        (data, work_id)
    }

    fn add_due_task(data: &mut CycleData, work_id: &str, title: &str, due: NaiveDate, done: bool) {
        data.tasks.push(Task {
            id: uid("task"),
            cycle_id: data.id.clone(),
            work_id: work_id.to_string(),
            title: title.to_string(),
            done,
            due_date: Some(due),
        });
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let today = date(2026, 8, 26);
        let (mut data, work_id) = data_with_work();
        add_due_task(&mut data, &work_id, "today", today, false);
        add_due_task(&mut data, &work_id, "last day", today + Duration::days(30), false);
        add_due_task(&mut data, &work_id, "too late", today + Duration::days(31), false);
        add_due_task(&mut data, &work_id, "yesterday", today - Duration::days(1), false);

        let upcoming = upcoming_tasks(&data, today, true);
        let titles: Vec<&str> = upcoming.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["today", "last day"]);
    }

    #[test]
    fn test_window_skips_undated_and_hides_done() {
        let today = date(2026, 8, 26);
        let (mut data, work_id) = data_with_work();
        data.add_task("no due".to_string(), work_id.clone(), None).unwrap();
        add_due_task(&mut data, &work_id, "done", today + Duration::days(2), true);
        add_due_task(&mut data, &work_id, "open", today + Duration::days(3), false);

        let hidden = upcoming_tasks(&data, today, false);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].title, "open");

        let all = upcoming_tasks(&data, today, true);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_window_sorted_by_due_date() {
        let today = date(2026, 8, 26);
        let (mut data, work_id) = data_with_work();
        add_due_task(&mut data, &work_id, "later", today + Duration::days(10), false);
        add_due_task(&mut data, &work_id, "sooner", today + Duration::days(1), false);

        let upcoming = upcoming_tasks(&data, today, true);
        assert_eq!(upcoming[0].title, "sooner");
        assert_eq!(upcoming[1].title, "later");
    }

    #[test]
    fn test_groups_orphans_last() {
        let today = date(2026, 8, 26);
        let (mut data, work_id) = data_with_work();
        add_due_task(&mut data, &work_id, "attached", today, false);
        add_due_task(&mut data, "work_gone", "orphan", today, false);

        let groups = todo_groups(&data, today, true);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].work_title, "Report");
        assert_eq!(groups[1].work_title, UNASSIGNED_WORK_TITLE);
        assert!(groups[1].work_id.is_none());
        assert_eq!(groups[1].tasks[0].title, "orphan");
    }

    #[test]
    fn test_groups_drop_empty_works() {
        let today = date(2026, 8, 26);
        let (mut data, _work_id) = data_with_work();
        data.add_work("Idle".to_string(), None, WorkStatus::NotStarted, None, None, None)
            .unwrap();

        let groups = todo_groups(&data, today, true);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_month_items_projects_all_kinds() {
        let (mut data, work_id) = data_with_work();
        data.add_goal(
            "Launch".to_string(),
            Some(date(2026, 8, 5)),
            Some(date(2026, 9, 5)),
        );
        add_due_task(&mut data, &work_id, "Draft", date(2026, 8, 10), true);

        let days = month_items(&data, 2026, 8);

        let start = &days[&date(2026, 8, 5)];
        assert_eq!(start.len(), 1);
        assert_eq!(start[0].label, "[Goal] Launch Start");
        assert_eq!(start[0].kind, CalendarItemKind::Goal);
        assert!(!start[0].completed);

        // goal end date falls in September, outside the requested month
        assert!(!days.contains_key(&date(2026, 9, 5)));

        let work_start = &days[&date(2026, 8, 1)];
        assert_eq!(work_start[0].label, "[Work] Report Start");
        assert_eq!(work_start[0].work_id.as_deref(), Some(work_id.as_str()));

        let due = &days[&date(2026, 8, 10)];
        assert_eq!(due[0].label, "[Task] Draft Due");
        assert!(due[0].completed);
    }

    #[test]
    fn test_month_items_goal_completed_follows_derived_status() {
        let mut data = CycleData::empty(
            "cycle_test".to_string(),
            "Test".to_string(),
            Utc::now(),
        );
        data.add_goal("Done goal".to_string(), Some(date(2026, 8, 2)), None);
        let goal_id = data.goals[0].id.clone();
        data.add_work(
            "Only work".to_string(),
            Some(goal_id),
            WorkStatus::Done,
            None,
            None,
            None,
        )
        .unwrap();

        let days = month_items(&data, 2026, 8);
        assert!(days[&date(2026, 8, 2)][0].completed);
    }

    #[test]
    fn test_month_items_empty_document() {
        let data = CycleData::empty("cycle_x".to_string(), "X".to_string(), Utc::now());
        assert!(month_items(&data, 2026, 8).is_empty());
    }
}
