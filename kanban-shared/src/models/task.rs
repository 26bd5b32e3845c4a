/// Task model and database operations
///
/// Tasks always live in a column of their project. Every read joins the
/// owning column so the row carries its status label.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     column_id BIGINT NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL CHECK (btrim(title) <> ''),
///     description TEXT,
///     ticket VARCHAR(64),
///     team VARCHAR(100),
///     assignee VARCHAR(255),
///     start_date DATE,
///     due_date DATE,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::task::{CreateTask, Priority, Task, UpdateTask};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, project_id: i64, todo: i64, done: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     column_id: todo,
///     title: "Write release notes".to_string(),
///     priority: Priority::High,
///     ..Default::default()
/// }).await?;
///
/// let moved = Task::update(&pool, task.id, UpdateTask {
///     column_id: Some(done),
///     ..Default::default()
/// }).await?;
/// assert_eq!(moved.map(|t| t.column_id), Some(done));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use std::str::FromStr;

/// Columns selected for every task read; expects `t` = task row, `c` = its column
const TASK_FIELDS: &str = "t.id, t.project_id, t.column_id, t.title, t.description, t.ticket, \
     t.team, t.assignee, t.start_date, t.due_date, t.priority, t.created_at, c.name AS status";

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid priority: {0} (expected low, medium or high)")]
pub struct InvalidPriority(pub String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

/// Task row joined with its column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub column_id: i64,
    pub title: String,
    pub description: Option<String>,

    /// External ticket reference (e.g. "DEV-42")
    pub ticket: Option<String>,

    pub team: Option<String>,
    pub assignee: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,

    /// Name of the owning column
    pub status: String,
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    pub project_id: i64,
    pub column_id: i64,

    /// Already trimmed and non-empty
    pub title: String,

    pub description: Option<String>,
    pub ticket: Option<String>,
    pub team: Option<String>,
    pub assignee: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

/// Partial task update
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub column_id: Option<i64>,
    pub description: Option<Option<String>>,
    pub ticket: Option<Option<String>>,
    pub team: Option<Option<String>>,
    pub assignee: Option<Option<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

impl UpdateTask {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.column_id.is_none()
            && self.description.is_none()
            && self.ticket.is_none()
            && self.team.is_none()
            && self.assignee.is_none()
            && self.start_date.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }

    /// Builds the `SET` clause; parameters start at `$2` (`$1` is the task id)
    fn set_clause(&self) -> String {
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        let mut push = |column: &str, present: bool| {
            if present {
                bind_count += 1;
                assignments.push(format!("{} = ${}", column, bind_count));
            }
        };

        push("title", self.title.is_some());
        push("column_id", self.column_id.is_some());
        push("description", self.description.is_some());
        push("ticket", self.ticket.is_some());
        push("team", self.team.is_some());
        push("assignee", self.assignee.is_some());
        push("start_date", self.start_date.is_some());
        push("due_date", self.due_date.is_some());
        push("priority", self.priority.is_some());

        assignments.join(", ")
    }
}

impl Task {
    /// Inserts a task and returns it with its column name
    ///
    /// The caller is responsible for checking that `column_id` belongs to
    /// `project_id`.
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            WITH t AS (
                INSERT INTO tasks
                    (project_id, column_id, title, description, ticket, team, assignee,
                     start_date, due_date, priority)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {TASK_FIELDS}
            FROM t
            JOIN board_columns c ON c.id = t.column_id
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.project_id)
            .bind(data.column_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.ticket)
            .bind(data.team)
            .bind(data.assignee)
            .bind(data.start_date)
            .bind(data.due_date)
            .bind(data.priority)
            .fetch_one(executor)
            .await?;

        Ok(task)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            SELECT {TASK_FIELDS}
            FROM tasks t
            JOIN board_columns c ON c.id = t.column_id
            WHERE t.id = $1
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(task)
    }

    /// Lists a project's tasks, newest first, optionally limited to one column
    pub async fn list_by_project<'e, E>(
        executor: E,
        project_id: i64,
        column_id: Option<i64>,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            SELECT {TASK_FIELDS}
            FROM tasks t
            JOIN board_columns c ON c.id = t.column_id
            WHERE t.project_id = $1
              AND ($2::BIGINT IS NULL OR t.column_id = $2)
            ORDER BY t.id DESC
            "#
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(column_id)
            .fetch_all(executor)
            .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Returns `None` if the task does not exist. An empty update is a plain
    /// read.
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if data.is_empty() {
            return Self::find_by_id(executor, id).await;
        }

        let query = format!(
            r#"
            WITH t AS (
                UPDATE tasks SET {}
                WHERE id = $1
                RETURNING *
            )
            SELECT {TASK_FIELDS}
            FROM t
            JOIN board_columns c ON c.id = t.column_id
            "#,
            data.set_clause()
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(column_id) = data.column_id {
            q = q.bind(column_id);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(ticket) = data.ticket {
            q = q.bind(ticket);
        }
        if let Some(team) = data.team {
            q = q.bind(team);
        }
        if let Some(assignee) = data.assignee {
            q = q.bind(assignee);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }

        let task = q.fetch_optional(executor).await?;

        Ok(task)
    }

    /// Hard-deletes a task; returns whether a row was removed
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trips_through_str() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(priority.as_str().parse::<Priority>(), Ok(priority));
        }
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::High.to_string(), "high");
    }

    #[test]
    fn test_priority_rejects_unknown_label() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err, InvalidPriority("urgent".to_string()));
        assert!(err.to_string().contains("urgent"));
        assert!("High".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
        assert!(serde_json::from_str::<Priority>("\"critical\"").is_err());
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let clear_description = UpdateTask {
            description: Some(None),
            ..Default::default()
        };
        assert!(!clear_description.is_empty());
    }

    #[test]
    fn test_set_clause_numbers_parameters_in_bind_order() {
        let update = UpdateTask {
            title: Some("Ship it".to_string()),
            team: Some(None),
            priority: Some(Priority::High),
            ..Default::default()
        };

        assert_eq!(update.set_clause(), "title = $2, team = $3, priority = $4");
    }

    #[test]
    fn test_set_clause_covers_every_field() {
        let update = UpdateTask {
            title: Some("t".to_string()),
            column_id: Some(1),
            description: Some(None),
            ticket: Some(None),
            team: Some(None),
            assignee: Some(None),
            start_date: Some(None),
            due_date: Some(None),
            priority: Some(Priority::Low),
        };

        assert_eq!(
            update.set_clause(),
            "title = $2, column_id = $3, description = $4, ticket = $5, team = $6, \
             assignee = $7, start_date = $8, due_date = $9, priority = $10"
        );
    }
}
