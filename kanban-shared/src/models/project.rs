/// Project model
///
/// A project is one board inside a space. The oldest project of a space is
/// its default board.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     space_id BIGINT NOT NULL REFERENCES spaces(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub space_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub async fn create<'e, E>(executor: E, space_id: i64, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (space_id, name)
            VALUES ($1, $2)
            RETURNING id, space_id, name, created_at
            "#,
        )
        .bind(space_id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    /// Lists the projects of a space, oldest first
    pub async fn list_by_space<'e, E>(executor: E, space_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, space_id, name, created_at
            FROM projects
            WHERE space_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(space_id)
        .fetch_all(executor)
        .await?;

        Ok(projects)
    }

    /// Returns the default (oldest) project of a space
    pub async fn first_in_space<'e, E>(executor: E, space_id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, space_id, name, created_at
            FROM projects
            WHERE space_id = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(space_id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    /// Checks whether a user reaches the project through space membership
    ///
    /// Returns false for projects that do not exist.
    pub async fn is_accessible_by<'e, E>(
        executor: E,
        project_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM projects p
                JOIN space_members sm ON sm.space_id = p.space_id
                WHERE p.id = $1 AND sm.user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }
}
