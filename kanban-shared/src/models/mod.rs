/// Database models for the Kanban board
///
/// Each model owns the SQL for its table. Query functions accept any
/// `PgExecutor`, so they run equally against a pool or inside a transaction.
///
/// # Models
///
/// - `user`: Users resolved from request headers
/// - `space`: Top-level workspaces
/// - `membership`: User-space links with roles
/// - `project`: Boards inside a space
/// - `column`: Ordered status buckets of a project
/// - `task`: Work items, read together with their column name
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::find_or_create_by_email(&pool, "ana@example.com").await?;
/// println!("Resolved user {}", user.id);
/// # Ok(())
/// # }
/// ```

pub mod column;
pub mod membership;
pub mod project;
pub mod space;
pub mod task;
pub mod user;
