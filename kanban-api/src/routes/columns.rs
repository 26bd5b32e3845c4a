/// Column endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:id/columns` - Columns in display order
/// - `POST /api/projects/:id/columns` - Add a column; 409 if the name is taken

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
    access::require_project_access,
    models::{
        column::{Column, CreateColumn},
        user::User,
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create column request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateColumnRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Defaults to one past the last column
    #[validate(range(
        min = 0,
        max = 1_000_000,
        message = "Position must be between 0 and 1000000"
    ))]
    pub position: Option<i32>,
}

pub async fn list_columns(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Column>>> {
    let project_id = parse_id(&project_id)?;
    require_project_access(&state.db, project_id, user.id).await?;

    let columns = Column::list_by_project(&state.db, project_id).await?;
    Ok(Json(columns))
}

pub async fn create_column(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let project_id = parse_id(&project_id)?;
    require_project_access(&state.db, project_id, user.id).await?;
    let name = required_text(req.name, "Name is required")?;

    let column = Column::create(
        &state.db,
        CreateColumn {
            project_id,
            name,
            position: req.position,
        },
    )
    .await?;
    tracing::info!(column_id = column.id, project_id, "Created column");

    Ok((StatusCode::CREATED, Json(column)))
}
