/// Space model
///
/// A space is the top-level workspace. Users see only the spaces they are
/// members of.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE spaces (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use super::membership::{CreateSpaceMember, MemberRole, SpaceMember};

/// Space record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Space {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Space {
    /// Inserts a space without any members
    ///
    /// Callers normally want [`Space::create_owned`] instead, which also
    /// records the creator as owner.
    pub async fn create<'e, E>(executor: E, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let space = sqlx::query_as::<_, Space>(
            r#"
            INSERT INTO spaces (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(space)
    }

    /// Creates a space and its owner membership in one transaction
    pub async fn create_owned(pool: &PgPool, name: &str, owner_id: i64) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let space = Self::create(&mut *tx, name).await?;
        SpaceMember::create(
            &mut *tx,
            CreateSpaceMember {
                space_id: space.id,
                user_id: owner_id,
                role: MemberRole::Owner,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(space_id = space.id, owner_id, "Space created");
        Ok(space)
    }

    /// Lists the spaces a user is a member of, oldest first
    pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let spaces = sqlx::query_as::<_, Space>(
            r#"
            SELECT s.id, s.name, s.created_at
            FROM spaces s
            JOIN space_members sm ON sm.space_id = s.id
            WHERE sm.user_id = $1
            ORDER BY s.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(spaces)
    }

    /// Returns the user's first (oldest) space
    pub async fn first_for_user<'e, E>(executor: E, user_id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let space = sqlx::query_as::<_, Space>(
            r#"
            SELECT s.id, s.name, s.created_at
            FROM spaces s
            JOIN space_members sm ON sm.space_id = s.id
            WHERE sm.user_id = $1
            ORDER BY s.id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(space)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let space = sqlx::query_as::<_, Space>(
            "SELECT id, name, created_at FROM spaces WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(space)
    }

    /// Deletes a space; projects, columns, tasks and memberships cascade
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM spaces WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
