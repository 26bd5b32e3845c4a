/// Column model
///
/// Columns are the ordered status buckets of a board. A column's name is the
/// status label tasks report (`todo`, `doing`, `done`, or anything custom).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE board_columns (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (project_id, name)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Highest position a caller may set explicitly
///
/// Leaves room below `i32::MAX` for appended columns.
pub const MAX_POSITION: i32 = 1_000_000;

/// Column record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    pub id: i64,
    pub project_id: i64,
    pub name: String,

    /// Display order, ascending
    pub position: i32,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a column
#[derive(Debug, Clone)]
pub struct CreateColumn {
    pub project_id: i64,
    pub name: String,

    /// Explicit position; `None` appends after the current last column
    ///
    /// Appending never overflows: it saturates at `i32::MAX`.
    pub position: Option<i32>,
}

impl Column {
    /// Creates a column
    ///
    /// # Errors
    ///
    /// Fails with a unique violation if the project already has a column
    /// with this name.
    pub async fn create<'e, E>(executor: E, data: CreateColumn) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO board_columns (project_id, name, position)
            VALUES (
                $1,
                $2,
                COALESCE(
                    $3,
                    (
                        SELECT COALESCE(LEAST(MAX(position), 2147483646) + 1, 0)
                        FROM board_columns
                        WHERE project_id = $1
                    )
                )
            )
            RETURNING id, project_id, name, position, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(&data.name)
        .bind(data.position)
        .fetch_one(executor)
        .await?;

        Ok(column)
    }

    /// Lists a project's columns in display order
    pub async fn list_by_project<'e, E>(executor: E, project_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, project_id, name, position, created_at
            FROM board_columns
            WHERE project_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(columns)
    }

    /// Finds a column by ID, scoped to a project
    pub async fn find_in_project<'e, E>(
        executor: E,
        project_id: i64,
        column_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, project_id, name, position, created_at
            FROM board_columns
            WHERE project_id = $1 AND id = $2
            "#,
        )
        .bind(project_id)
        .bind(column_id)
        .fetch_optional(executor)
        .await?;

        Ok(column)
    }

    /// Finds the column whose name matches a status label
    pub async fn find_by_name<'e, E>(
        executor: E,
        project_id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, project_id, name, position, created_at
            FROM board_columns
            WHERE project_id = $1 AND name = $2
            "#,
        )
        .bind(project_id)
        .bind(name)
        .fetch_optional(executor)
        .await?;

        Ok(column)
    }
}
