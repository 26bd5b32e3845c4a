/// Board context endpoint
///
/// Front ends call this first: it returns who the caller is and the board
/// they land on, provisioning that board on first use.
///
/// # Endpoint
///
/// ```text
/// GET /api/context
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": 1, "email": "demo@local", "name": "demo", "created_at": "..." },
///   "space": { "id": 1, "name": "My Space", "created_at": "..." },
///   "project": { "id": 1, "space_id": 1, "name": "Default", "created_at": "..." },
///   "columns": [ { "id": 1, "project_id": 1, "name": "todo", "position": 0, ... } ],
///   "column_by_name": { "todo": { ... }, "doing": { ... }, "done": { ... } }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use kanban_shared::{
    models::{column::Column, project::Project, space::Space, user::User},
    workspace::{ensure_default_workspace, Workspace},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResponse {
    pub user: User,
    pub space: Space,
    pub project: Project,
    pub columns: Vec<Column>,
    pub column_by_name: BTreeMap<String, Column>,
}

impl ContextResponse {
    pub fn new(user: User, workspace: Workspace) -> Self {
        let column_by_name = workspace.column_by_name();
        Self {
            user,
            space: workspace.space,
            project: workspace.project,
            columns: workspace.columns,
            column_by_name,
        }
    }
}

pub async fn get_context(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<ContextResponse>> {
    let workspace = ensure_default_workspace(&state.db, user.id).await?;
    Ok(Json(ContextResponse::new(user, workspace)))
}
