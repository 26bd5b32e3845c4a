/// Common test utilities for integration tests
///
/// - Test database setup (migrations applied once per context); skipped
///   when `DATABASE_URL` is not set
/// - A router wired to that database
/// - Request helpers that send the identity headers
/// - Per-test users with unique emails, removed on cleanup

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    Router,
};
use kanban_api::{
    app::{build_router, AppState},
    config::Config,
};
use kanban_shared::{
    db::{migrations::run_migrations, pool::create_pool},
    models::{space::Space, user::User},
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    emails: Vec<String>,
}

/// Response status plus body, parsed as JSON when possible
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("Expected JSON body, got {:?}: {}", self.text, e))
    }
}

impl TestContext {
    /// Connects to `DATABASE_URL`; `None` when the variable is unset
    pub async fn new() -> Option<Self> {
        dotenvy::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(url.clone()),
            "DATABASE_MAX_CONNECTIONS" => Some("5".to_string()),
            _ => None,
        })
        .expect("Failed to build test config");

        let db = create_pool(config.database.pool_config())
            .await
            .expect("Failed to create pool");
        run_migrations(&db).await.expect("Failed to run migrations");

        let app = build_router(AppState::new(db.clone(), config));

        Some(Self {
            db,
            app,
            emails: Vec::new(),
        })
    }

    /// Registers a unique email for this test; the user is created on first request
    pub fn new_email(&mut self, label: &str) -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let email = format!("{}-{}-{}@test.local", label, nanos, self.emails.len());
        self.emails.push(email.to_lowercase());
        email
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        email: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = email {
            // from_bytes keeps non-ASCII addresses intact
            let value = HeaderValue::from_bytes(email.as_bytes()).unwrap();
            builder = builder.header("x-user-email", value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            text: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    pub async fn get(&self, uri: &str, email: &str) -> TestResponse {
        self.request("GET", uri, Some(email), None).await
    }

    pub async fn post(&self, uri: &str, email: &str, body: Value) -> TestResponse {
        self.request("POST", uri, Some(email), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, email: &str, body: Value) -> TestResponse {
        self.request("PATCH", uri, Some(email), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, email: &str) -> TestResponse {
        self.request("DELETE", uri, Some(email), None).await
    }

    /// Deletes every space and user this context created
    pub async fn cleanup(&self) {
        for email in &self.emails {
            if let Ok(Some(user)) = User::find_by_email(&self.db, email).await {
                for space in Space::list_for_user(&self.db, user.id).await.unwrap_or_default() {
                    let _ = Space::delete(&self.db, space.id).await;
                }
                let _ = User::delete(&self.db, user.id).await;
            }
        }
    }
}
