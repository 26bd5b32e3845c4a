/// API route handlers
///
/// Handlers are grouped by resource:
///
/// - `health`: Liveness and database status
/// - `context`: The caller's default space, project and columns
/// - `spaces`: Spaces the caller belongs to
/// - `projects`: Projects inside a space
/// - `columns`: Columns of a project
/// - `tasks`: Tasks, per project and in the default project

pub mod columns;
pub mod context;
pub mod health;
pub mod projects;
pub mod spaces;
pub mod tasks;
