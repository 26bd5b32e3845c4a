/// User model and database operations
///
/// Users are never registered explicitly. The API resolves one from the
/// `x-user-id` / `x-user-email` request headers and creates it on first sight.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Email used when a request carries no `x-user-email` header
pub const DEFAULT_EMAIL: &str = "demo@local";

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address, unique across users
    pub email: String,

    /// Display name (defaults to the email local part)
    pub name: Option<String>,

    /// When the user row was created
    pub created_at: DateTime<Utc>,
}

/// Normalizes a raw email header value
///
/// Trims whitespace and lower-cases; blank input falls back to [`DEFAULT_EMAIL`].
pub fn normalize_email(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(email) if !email.is_empty() => email.to_lowercase(),
        _ => DEFAULT_EMAIL.to_string(),
    }
}

/// Derives a display name from an email address
pub fn display_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or(email)
        .to_string()
}

impl User {
    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Returns the user with `email`, inserting it if missing
    ///
    /// Runs as a single upsert so two concurrent first requests for the same
    /// email resolve to the same row instead of failing on the unique index.
    pub async fn find_or_create_by_email<'e, E>(executor: E, email: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(email)
        .bind(display_name(email))
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Deletes a user and, through cascades, their memberships
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
