//! # Kanban API Server Library
//!
//! REST API for the Kanban board: spaces, projects, columns and tasks scoped
//! by space membership.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors (validated JSON bodies, path ids)
//! - `middleware`: Identity resolution and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
