/// Space endpoints
///
/// # Endpoints
///
/// - `GET /api/spaces` - Spaces the caller is a member of, oldest first
/// - `POST /api/spaces` - Create a space owned by the caller

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{required_text, trimmed, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use kanban_shared::models::{space::Space, user::User};
use serde::Deserialize;
use validator::Validate;

/// Create space request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

pub async fn list_spaces(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<Space>>> {
    let spaces = Space::list_for_user(&state.db, user.id).await?;
    Ok(Json(spaces))
}

/// Creates the space and the caller's owner membership in one transaction
pub async fn create_space(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(req): ValidatedJson<CreateSpaceRequest>,
) -> ApiResult<(StatusCode, Json<Space>)> {
    let name = required_text(req.name, "Name is required")?;

    let space = Space::create_owned(&state.db, &name, user.id).await?;
    tracing::info!(space_id = space.id, user_id = user.id, "Created space");

    Ok((StatusCode::CREATED, Json(space)))
}
