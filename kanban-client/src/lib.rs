//! # Kanban Client
//!
//! Typed access to the Kanban API plus the state a front end keeps between
//! requests.
//!
//! ## Modules
//!
//! - `api`: The [`api::BoardApi`] trait and its reqwest implementation
//! - `error`: Client error type
//! - `store`: Space, view and board state containers
//! - `summary`: Derived rows for the list, timeline and dashboard views
//!
//! ## Example
//!
//! ```no_run
//! use kanban_client::{api::HttpClient, store::BoardStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> kanban_client::error::ClientResult<()> {
//! let api = Arc::new(HttpClient::from_env()?);
//! let mut board = BoardStore::new(api);
//! board.load().await;
//!
//! for group in board.grouped() {
//!     println!("{}: {} tasks", group.column.name, group.tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod store;
pub mod summary;

#[cfg(test)]
pub(crate) mod fake;
