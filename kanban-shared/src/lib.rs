//! # Kanban Shared Library
//!
//! Data layer shared by the Kanban API server and client.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migration runner
//! - `models`: Database models and their queries
//! - `access`: Space membership checks for projects, columns and tasks
//! - `workspace`: Default space/project/column provisioning per user

pub mod access;
pub mod db;
pub mod models;
pub mod workspace;

/// Current version of the Kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
