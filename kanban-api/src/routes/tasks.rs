/// Task endpoints
///
/// Tasks live in a column of a project. A task's `status` is the name of
/// its column, so moving a task means pointing it at another column of the
/// same project.
///
/// # Endpoints
///
/// - `GET /api/projects/:id/tasks[?column_id=N]` - Project tasks, newest first
/// - `POST /api/projects/:id/tasks` - Create in a column given by `column_id` or `status`
/// - `GET /api/tasks` - Tasks of the caller's default project
/// - `POST /api/tasks` - Create in the default project (`status` defaults to `todo`)
/// - `PATCH /api/tasks/:id` - Partial update
/// - `DELETE /api/tasks/:id` - Hard delete
///
/// # Example
///
/// ```text
/// PATCH /api/tasks/12
/// Content-Type: application/json
///
/// { "status": "done", "assignee": null, "due_date": "2025-03-01" }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{
        nullable, optional_date, optional_text, parse_id, required_text, trimmed, ValidatedJson,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    access::{require_project_access, require_task_access},
    models::{
        column::Column,
        task::{CreateTask, Priority, Task, UpdateTask},
        user::User,
    },
    workspace::{ensure_default_workspace, DEFAULT_STATUS},
};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

const TITLE_REQUIRED: &str = "Title is required";
const INVALID_STATUS: &str = "Invalid status";
const INVALID_COLUMN: &str = "Invalid column";

/// Create task request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    /// Column name; ignored when `column_id` is given
    pub status: Option<String>,

    pub column_id: Option<i64>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 64, message = "Ticket must be at most 64 characters"))]
    pub ticket: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 100, message = "Team must be at most 100 characters"))]
    pub team: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "Assignee must be at most 255 characters"))]
    pub assignee: Option<String>,

    /// `YYYY-MM-DD`
    pub start_date: Option<String>,

    /// `YYYY-MM-DD`
    pub due_date: Option<String>,

    pub priority: Option<Priority>,
}

impl CreateTaskRequest {
    fn into_create(self, project_id: i64, column_id: i64, title: String) -> ApiResult<CreateTask> {
        Ok(CreateTask {
            project_id,
            column_id,
            title,
            description: optional_text(self.description),
            ticket: optional_text(self.ticket),
            team: optional_text(self.team),
            assignee: optional_text(self.assignee),
            start_date: optional_date("start_date", self.start_date)?,
            due_date: optional_date("due_date", self.due_date)?,
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// Partial task update
///
/// Text and date fields distinguish "absent" (unchanged) from `null` or
/// `""` (cleared).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    /// Column name in the task's project; wins over `column_id`
    pub status: Option<String>,

    pub column_id: Option<i64>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub ticket: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub team: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub assignee: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,

    pub priority: Option<Priority>,
}

impl UpdateTaskRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.column_id.is_none()
            && self.description.is_none()
            && self.ticket.is_none()
            && self.team.is_none()
            && self.assignee.is_none()
            && self.start_date.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }

    /// Checks every field except placement, which needs the database
    fn to_update(&self) -> ApiResult<UpdateTask> {
        let title = match &self.title {
            Some(title) => Some(required_text(Some(title.clone()), "Title cannot be empty")?),
            None => None,
        };

        check_len("Ticket", &self.ticket, 64)?;
        check_len("Team", &self.team, 100)?;
        check_len("Assignee", &self.assignee, 255)?;
        check_len("Description", &self.description, 10000)?;

        Ok(UpdateTask {
            title,
            column_id: None,
            description: self.description.clone(),
            ticket: self.ticket.clone(),
            team: self.team.clone(),
            assignee: self.assignee.clone(),
            start_date: nullable_date("start_date", &self.start_date)?,
            due_date: nullable_date("due_date", &self.due_date)?,
            priority: self.priority,
        })
    }
}

fn check_len(field: &str, value: &Option<Option<String>>, max: usize) -> ApiResult<()> {
    match value {
        Some(Some(text)) if text.chars().count() > max => Err(ApiError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

fn nullable_date(
    field: &str,
    value: &Option<Option<String>>,
) -> ApiResult<Option<Option<chrono::NaiveDate>>> {
    match value {
        None => Ok(None),
        Some(text) => Ok(Some(optional_date(field, text.clone())?)),
    }
}

/// Project task list filter
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    /// Non-integer values are ignored
    pub column_id: Option<String>,
}

impl TaskFilter {
    fn column_id(&self) -> Option<i64> {
        self.column_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }
}

/// Finds the target column inside a project
///
/// `column_id` wins over `status`; with neither, `default_status` is used
/// if given.
async fn resolve_column(
    pool: &PgPool,
    project_id: i64,
    column_id: Option<i64>,
    status: Option<&str>,
    default_status: Option<&str>,
) -> ApiResult<Column> {
    if let Some(column_id) = column_id {
        return Column::find_in_project(pool, project_id, column_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest(INVALID_COLUMN.to_string()));
    }

    match status.map(str::trim).or(default_status) {
        Some(status) => Column::find_by_name(pool, project_id, status)
            .await?
            .ok_or_else(|| ApiError::BadRequest(INVALID_STATUS.to_string())),
        None => Err(ApiError::BadRequest(INVALID_COLUMN.to_string())),
    }
}

pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_id): Path<String>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let project_id = parse_id(&project_id)?;
    require_project_access(&state.db, project_id, user.id).await?;

    let tasks = Task::list_by_project(&state.db, project_id, filter.column_id()).await?;
    Ok(Json(tasks))
}

pub async fn create_project_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_id): Path<String>,
    ValidatedJson(mut req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let project_id = parse_id(&project_id)?;
    require_project_access(&state.db, project_id, user.id).await?;
    let title = required_text(req.title.take(), TITLE_REQUIRED)?;

    let column = resolve_column(
        &state.db,
        project_id,
        req.column_id,
        req.status.as_deref(),
        None,
    )
    .await?;

    let task = Task::create(&state.db, req.into_create(project_id, column.id, title)?).await?;
    tracing::info!(task_id = task.id, project_id, status = %task.status, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_default_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<Task>>> {
    let workspace = ensure_default_workspace(&state.db, user.id).await?;

    let tasks = Task::list_by_project(&state.db, workspace.project.id, None).await?;
    Ok(Json(tasks))
}

pub async fn create_default_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(mut req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = required_text(req.title.take(), TITLE_REQUIRED)?;
    let workspace = ensure_default_workspace(&state.db, user.id).await?;
    let project_id = workspace.project.id;

    let column = resolve_column(
        &state.db,
        project_id,
        req.column_id,
        req.status.as_deref(),
        Some(DEFAULT_STATUS),
    )
    .await?;

    let task = Task::create(&state.db, req.into_create(project_id, column.id, title)?).await?;
    tracing::info!(task_id = task.id, project_id, status = %task.status, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task_id = parse_id(&task_id)?;
    if req.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let task = require_task_access(&state.db, task_id, user.id).await?;
    let mut update = req.to_update()?;

    if req.status.is_some() || req.column_id.is_some() {
        // Status wins when both are sent
        let column_id = if req.status.is_some() { None } else { req.column_id };
        let column = resolve_column(
            &state.db,
            task.project_id,
            column_id,
            req.status.as_deref(),
            None,
        )
        .await?;
        update.column_id = Some(column.id);
    }

    let task = Task::update(&state.db, task_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    tracing::debug!(task_id, status = %task.status, "Updated task");

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    let task_id = parse_id(&task_id)?;
    require_task_access(&state.db, task_id, user.id).await?;

    if !Task::delete(&state.db, task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    tracing::info!(task_id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}
