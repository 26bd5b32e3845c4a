/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use kanban_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        identity::{resolve_identity, USER_EMAIL_HEADER, USER_ID_HEADER},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor; the pool
/// and config are both reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /api
/// ├── GET    /health                     # public, no identity
/// ├── GET    /context                    # default space/project/columns
/// ├── GET    /spaces
/// ├── POST   /spaces
/// ├── GET    /spaces/:id/projects
/// ├── POST   /spaces/:id/projects
/// ├── GET    /projects/:id/columns
/// ├── POST   /projects/:id/columns
/// ├── GET    /projects/:id/tasks         # ?column_id=N
/// ├── POST   /projects/:id/tasks
/// ├── GET    /tasks                      # default project
/// ├── POST   /tasks
/// ├── PATCH  /tasks/:id
/// └── DELETE /tasks/:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then identity
/// resolution on every route except health.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new().route("/api/health", get(routes::health::health_check));

    let board_routes = Router::new()
        .route("/api/context", get(routes::context::get_context))
        .route(
            "/api/spaces",
            get(routes::spaces::list_spaces).post(routes::spaces::create_space),
        )
        .route(
            "/api/spaces/:id/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/:id/columns",
            get(routes::columns::list_columns).post(routes::columns::create_column),
        )
        .route(
            "/api/projects/:id/tasks",
            get(routes::tasks::list_project_tasks).post(routes::tasks::create_project_task),
        )
        .route(
            "/api/tasks",
            get(routes::tasks::list_default_tasks).post(routes::tasks::create_default_task),
        )
        .route(
            "/api/tasks/:id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ));

    Router::new()
        .merge(public_routes)
        .merge(board_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy: permissive when `*` is configured, otherwise the listed origins
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_EMAIL_HEADER),
        ])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, LogConfig};
    use axum::{body::Body, extract::Request, http::StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_config(cors_origins: &[&str]) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                cors_origins: cors_origins.iter().map(|o| o.to_string()).collect(),
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/kanban_test".to_string(),
                max_connections: 1,
                create_if_missing: false,
            },
            log: LogConfig::default(),
        }
    }

    fn lazy_state(cors_origins: &[&str]) -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/kanban_test")
            .unwrap();
        AppState::new(pool, test_config(cors_origins))
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = build_router(lazy_state(&["*"]));

        let response = app
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight_for_listed_origin() {
        let app = build_router(lazy_state(&["http://localhost:5173"]));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/tasks")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-user-email")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }
}
