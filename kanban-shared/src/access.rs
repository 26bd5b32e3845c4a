/// Access checks for board resources
///
/// Every resource hangs off a space, and a user may touch it only if they
/// are a member of that space:
///
/// 1. **Space**: direct membership row
/// 2. **Project**: membership of the project's space
/// 3. **Task**: membership of the space owning the task's project
///
/// # Example
///
/// ```no_run
/// use kanban_shared::access::{require_project_access, require_task_access};
/// use sqlx::PgPool;
///
/// async fn check(pool: &PgPool, user_id: i64) -> Result<(), kanban_shared::access::AccessError> {
///     require_project_access(pool, 7, user_id).await?;
///     let task = require_task_access(pool, 42, user_id).await?;
///     println!("task {} is in column {}", task.id, task.status);
///     Ok(())
/// }
/// ```

use sqlx::PgPool;

use crate::models::{membership::SpaceMember, project::Project, task::Task};

/// Error type for access checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// User is not a member of the space
    #[error("No access to space {0}")]
    SpaceDenied(i64),

    /// Project does not exist or user is not a member of its space
    #[error("No access to project {0}")]
    ProjectDenied(i64),

    /// Task exists but user is not a member of its space
    #[error("No access to task {0}")]
    TaskDenied(i64),

    /// Task does not exist
    #[error("Task {0} not found")]
    TaskNotFound(i64),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Requires the user to be a member of the space
pub async fn require_space_member(
    pool: &PgPool,
    space_id: i64,
    user_id: i64,
) -> Result<(), AccessError> {
    if !SpaceMember::has_access(pool, space_id, user_id).await? {
        tracing::debug!(space_id, user_id, "Space access denied");
        return Err(AccessError::SpaceDenied(space_id));
    }

    Ok(())
}

/// Requires the user to reach the project through space membership
///
/// Unknown projects are denied rather than reported missing.
pub async fn require_project_access(
    pool: &PgPool,
    project_id: i64,
    user_id: i64,
) -> Result<(), AccessError> {
    if !Project::is_accessible_by(pool, project_id, user_id).await? {
        tracing::debug!(project_id, user_id, "Project access denied");
        return Err(AccessError::ProjectDenied(project_id));
    }

    Ok(())
}

/// Loads a task the user may modify
///
/// # Errors
///
/// - `TaskNotFound` if no task has this id
/// - `TaskDenied` if the user is not a member of the owning space
pub async fn require_task_access(
    pool: &PgPool,
    task_id: i64,
    user_id: i64,
) -> Result<Task, AccessError> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(AccessError::TaskNotFound(task_id))?;

    if !Project::is_accessible_by(pool, task.project_id, user_id).await? {
        tracing::debug!(task_id, user_id, "Task access denied");
        return Err(AccessError::TaskDenied(task_id));
    }

    Ok(task)
}
