/// Rows derived from a board's tasks for the non-board views
///
/// - [`dashboard`]: totals, share per column and the latest tasks
/// - [`timeline`]: tasks ordered by start date
/// - [`list_rows`]: flat table rows in list order
///
/// All of these are pure functions over what a [`crate::store::BoardStore`]
/// already holds.

use chrono::{DateTime, NaiveDate, Utc};
use kanban_shared::models::{
    column::Column,
    task::{Priority, Task},
};
use serde::Serialize;

/// Number of tasks listed under "recent" on the dashboard
pub const RECENT_LIMIT: usize = 5;

/// Ticket key shown for a task: its own ticket, else `DEV-<id>`
pub fn ticket_label(task: &Task) -> String {
    match task.ticket.as_deref().map(str::trim) {
        Some(ticket) if !ticket.is_empty() => ticket.to_string(),
        _ => format!("DEV-{}", task.id),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnShare {
    pub status: String,
    pub count: usize,

    /// Rounded to the nearest whole percent
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTask {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_column: Vec<ColumnShare>,
    pub recent: Vec<RecentTask>,
}

pub fn dashboard(columns: &[Column], tasks: &[Task]) -> DashboardSummary {
    let total = tasks.len();

    let by_column = columns
        .iter()
        .map(|column| {
            let count = tasks.iter().filter(|t| t.status == column.name).count();
            ColumnShare {
                status: column.name.clone(),
                count,
                percent: percent(count, total),
            }
        })
        .collect();

    let mut newest: Vec<&Task> = tasks.iter().collect();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let recent = newest
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|t| RecentTask {
            id: t.id,
            title: t.title.clone(),
            status: t.status.clone(),
            created_at: t.created_at,
        })
        .collect();

    DashboardSummary {
        total,
        by_column,
        recent,
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub task_id: i64,
    pub label: String,
    pub title: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

/// Tasks by start date; undated tasks go last, ties keep id order
pub fn timeline(tasks: &[Task]) -> Vec<TimelineRow> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| match (a.start_date, b.start_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });

    sorted
        .into_iter()
        .map(|t| TimelineRow {
            task_id: t.id,
            label: ticket_label(t),
            title: t.title.clone(),
            status: t.status.clone(),
            start_date: t.start_date,
            due_date: t.due_date,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub task_id: i64,
    pub key: String,
    pub title: String,
    pub status: String,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

pub fn list_rows(tasks: &[Task]) -> Vec<ListRow> {
    tasks
        .iter()
        .map(|t| ListRow {
            task_id: t.id,
            key: ticket_label(t),
            title: t.title.clone(),
            status: t.status.clone(),
            assignee: t.assignee.clone(),
            due_date: t.due_date,
            priority: t.priority,
        })
        .collect()
}
