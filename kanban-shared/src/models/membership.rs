/// Space membership model
///
/// Links users to spaces. Every project, column and task access check
/// ultimately resolves to a row in this table.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE space_role AS ENUM ('owner', 'member');
///
/// CREATE TABLE space_members (
///     space_id BIGINT NOT NULL REFERENCES spaces(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role space_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (space_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Role of a user within a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "space_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Created the space
    Owner,

    /// Invited collaborator
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Member => "member",
        }
    }
}

/// Membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpaceMember {
    pub space_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a user to a space
#[derive(Debug, Clone)]
pub struct CreateSpaceMember {
    pub space_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
}

impl SpaceMember {
    /// Adds a user to a space
    ///
    /// # Errors
    ///
    /// Fails with a unique violation if the membership already exists, or a
    /// foreign key violation if the space or user does not.
    pub async fn create<'e, E>(executor: E, data: CreateSpaceMember) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let member = sqlx::query_as::<_, SpaceMember>(
            r#"
            INSERT INTO space_members (space_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING space_id, user_id, role, created_at
            "#,
        )
        .bind(data.space_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    /// Checks whether a user belongs to a space (any role)
    pub async fn has_access<'e, E>(executor: E, space_id: i64, user_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM space_members
                WHERE space_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(space_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in a space, if they are a member
    pub async fn get_role<'e, E>(
        executor: E,
        space_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberRole>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let role: Option<MemberRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM space_members
            WHERE space_id = $1 AND user_id = $2
            "#,
        )
        .bind(space_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(MemberRole::Owner.as_str(), "owner");
        assert_eq!(MemberRole::Member.as_str(), "member");
    }

    #[test]
    fn test_member_role_serialization() {
        assert_eq!(serde_json::to_string(&MemberRole::Owner).unwrap(), "\"owner\"");
        let role: MemberRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, MemberRole::Member);
    }
}
