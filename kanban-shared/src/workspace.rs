/// Default workspace provisioning
///
/// Every user gets a working board without any setup: on first use they
/// receive a space they own, a default project in it, and the three standard
/// columns.
///
/// Provisioning runs in one transaction that first takes a per-user
/// advisory lock, so concurrent first requests from the same user wait for
/// each other and all observe the same space, project and columns.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::workspace::ensure_default_workspace;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64) -> Result<(), sqlx::Error> {
/// let workspace = ensure_default_workspace(&pool, user_id).await?;
/// let todo = workspace.column_named("todo").expect("seeded");
/// println!("project {} / column {}", workspace.project.id, todo.id);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::info;

use crate::models::{
    column::{Column, CreateColumn},
    membership::{CreateSpaceMember, MemberRole, SpaceMember},
    project::Project,
    space::Space,
};

/// Name given to a user's auto-created space
pub const DEFAULT_SPACE_NAME: &str = "My Space";

/// Name given to a space's auto-created project
pub const DEFAULT_PROJECT_NAME: &str = "Default";

/// Columns seeded into an empty default project, in display order
pub const DEFAULT_COLUMNS: [&str; 3] = ["todo", "doing", "done"];

/// Status assigned to new tasks that do not name one
pub const DEFAULT_STATUS: &str = DEFAULT_COLUMNS[0];

/// A user's default space, project and the project's columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub space: Space,
    pub project: Project,

    /// Ordered by position
    pub columns: Vec<Column>,
}

impl Workspace {
    /// Looks up a column by its status label
    pub fn column_named(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Maps status label to column
    pub fn column_by_name(&self) -> BTreeMap<String, Column> {
        self.columns
            .iter()
            .map(|column| (column.name.clone(), column.clone()))
            .collect()
    }
}

/// Returns the user's default workspace, creating any missing part
///
/// - first space the user belongs to, else a new one they own
/// - first project of that space, else a new one
/// - that project's columns, else the [`DEFAULT_COLUMNS`]
///
/// Calling it again returns the same rows.
pub async fn ensure_default_workspace(pool: &PgPool, user_id: i64) -> Result<Workspace, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let space = match Space::first_for_user(&mut *tx, user_id).await? {
        Some(space) => space,
        None => {
            let space = Space::create(&mut *tx, DEFAULT_SPACE_NAME).await?;
            SpaceMember::create(
                &mut *tx,
                CreateSpaceMember {
                    space_id: space.id,
                    user_id,
                    role: MemberRole::Owner,
                },
            )
            .await?;
            info!(user_id, space_id = space.id, "Provisioned default space");
            space
        }
    };

    let project = match Project::first_in_space(&mut *tx, space.id).await? {
        Some(project) => project,
        None => {
            let project = Project::create(&mut *tx, space.id, DEFAULT_PROJECT_NAME).await?;
            info!(user_id, project_id = project.id, "Provisioned default project");
            project
        }
    };

    let mut columns = Column::list_by_project(&mut *tx, project.id).await?;
    if columns.is_empty() {
        for (position, name) in DEFAULT_COLUMNS.iter().enumerate() {
            let column = Column::create(
                &mut *tx,
                CreateColumn {
                    project_id: project.id,
                    name: name.to_string(),
                    position: Some(position as i32),
                },
            )
            .await?;
            columns.push(column);
        }
        info!(user_id, project_id = project.id, "Seeded default columns");
    }

    tx.commit().await?;

    Ok(Workspace {
        space,
        project,
        columns,
    })
}
