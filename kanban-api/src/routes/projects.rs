/// Project endpoints
///
/// Both routes require the caller to be a member of the space.
///
/// # Endpoints
///
/// - `GET /api/spaces/:id/projects` - Projects in the space, oldest first
/// - `POST /api/spaces/:id/projects` - Create a project (no columns are seeded)

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, required_text, trimmed, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    access::require_space_member,
    models::{project::Project, user::User},
};
use serde::Deserialize;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(space_id): Path<String>,
) -> ApiResult<Json<Vec<Project>>> {
    let space_id = parse_id(&space_id)?;
    require_space_member(&state.db, space_id, user.id).await?;

    let projects = Project::list_by_space(&state.db, space_id).await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(space_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let space_id = parse_id(&space_id)?;
    require_space_member(&state.db, space_id, user.id).await?;
    let name = required_text(req.name, "Name is required")?;

    let project = Project::create(&state.db, space_id, &name).await?;
    tracing::info!(project_id = project.id, space_id, "Created project");

    Ok((StatusCode::CREATED, Json(project)))
}
