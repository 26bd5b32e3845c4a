/// Typed access to the Kanban REST API
///
/// Stores talk to the server through the [`BoardApi`] trait so they can be
/// driven by an in-memory implementation in tests. [`HttpClient`] is the
/// reqwest implementation; it sends the identity headers on every call.
///
/// # Environment Variables
///
/// - `KANBAN_API_URL`: Server base URL (default: http://localhost:3001)
/// - `KANBAN_USER_ID`: Optional numeric user id sent as `x-user-id`
/// - `KANBAN_USER_EMAIL`: Optional email sent as `x-user-email`

use async_trait::async_trait;
use chrono::NaiveDate;
use kanban_shared::models::{
    column::Column,
    project::Project,
    space::Space,
    task::{Priority, Task},
    user::User,
};
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{collections::BTreeMap, env};

use crate::error::{ClientError, ClientResult};

/// Base URL used when `KANBAN_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// The caller's default board, as returned by `GET /api/context`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardContext {
    pub user: User,
    pub space: Space,
    pub project: Project,

    /// Ordered by position
    pub columns: Vec<Column>,
    pub column_by_name: BTreeMap<String, Column>,
}

/// Body for creating a task
///
/// Unset fields are left out of the JSON so the server applies its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Body for a partial task update
///
/// `None` leaves a field alone. For the nullable fields `Some(None)` is sent
/// as `null`, which clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Patch that moves a task to the column named `status`
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Operations the client stores need from the server
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `GET /api/spaces`
    async fn list_spaces(&self) -> ClientResult<Vec<Space>>;

    /// `POST /api/spaces`
    async fn create_space(&self, name: &str) -> ClientResult<Space>;

    /// `GET /api/context`
    async fn context(&self) -> ClientResult<BoardContext>;

    /// `GET /api/tasks`
    async fn list_tasks(&self) -> ClientResult<Vec<Task>>;

    /// `POST /api/tasks`
    async fn create_task(&self, task: &NewTask) -> ClientResult<Task>;

    /// `PATCH /api/tasks/:id`
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> ClientResult<Task>;

    /// `DELETE /api/tasks/:id`
    async fn delete_task(&self, id: i64) -> ClientResult<()>;
}

/// Connection settings for [`HttpClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_id: None,
            user_email: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("KANBAN_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let user_id = match lookup("KANBAN_USER_ID").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                ClientError::Config(format!("KANBAN_USER_ID must be an integer, got '{}'", raw))
            })?),
            None => None,
        };

        let user_email = lookup("KANBAN_USER_EMAIL")
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Ok(Self {
            base_url,
            user_id,
            user_email,
        })
    }

    /// Absolute URL for an API path such as `/api/tasks`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// reqwest-backed API client
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> ClientResult<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.config.url(path));

        if let Some(id) = self.config.user_id {
            builder = builder.header("x-user-id", id.to_string());
        }
        if let Some(email) = &self.config.user_email {
            builder = builder.header("x-user-email", email.as_str());
        }

        builder
    }

    async fn execute(builder: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %message, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        Ok(Self::execute(builder).await?.json::<T>().await?)
    }

    /// `GET /api/spaces/:id/projects`
    pub async fn list_projects(&self, space_id: i64) -> ClientResult<Vec<Project>> {
        Self::fetch(self.request(Method::GET, &format!("/api/spaces/{}/projects", space_id))).await
    }

    /// `POST /api/spaces/:id/projects`
    pub async fn create_project(&self, space_id: i64, name: &str) -> ClientResult<Project> {
        let body = NameBody { name };
        Self::fetch(
            self.request(Method::POST, &format!("/api/spaces/{}/projects", space_id))
                .json(&body),
        )
        .await
    }

    /// `GET /api/projects/:id/columns`
    pub async fn list_columns(&self, project_id: i64) -> ClientResult<Vec<Column>> {
        Self::fetch(self.request(Method::GET, &format!("/api/projects/{}/columns", project_id)))
            .await
    }

    /// `POST /api/projects/:id/columns`
    pub async fn create_column(
        &self,
        project_id: i64,
        name: &str,
        position: Option<i32>,
    ) -> ClientResult<Column> {
        let body = ColumnBody { name, position };
        Self::fetch(
            self.request(Method::POST, &format!("/api/projects/{}/columns", project_id))
                .json(&body),
        )
        .await
    }

    /// `GET /api/projects/:id/tasks[?column_id=N]`
    pub async fn list_project_tasks(
        &self,
        project_id: i64,
        column_id: Option<i64>,
    ) -> ClientResult<Vec<Task>> {
        let mut builder = self.request(Method::GET, &format!("/api/projects/{}/tasks", project_id));
        if let Some(column_id) = column_id {
            builder = builder.query(&[("column_id", column_id)]);
        }
        Self::fetch(builder).await
    }

    /// `POST /api/projects/:id/tasks`
    pub async fn create_project_task(&self, project_id: i64, task: &NewTask) -> ClientResult<Task> {
        Self::fetch(
            self.request(Method::POST, &format!("/api/projects/{}/tasks", project_id))
                .json(task),
        )
        .await
    }
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ColumnBody<'a> {
    name: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<i32>,
}

#[async_trait]
impl BoardApi for HttpClient {
    async fn list_spaces(&self) -> ClientResult<Vec<Space>> {
        Self::fetch(self.request(Method::GET, "/api/spaces")).await
    }

    async fn create_space(&self, name: &str) -> ClientResult<Space> {
        Self::fetch(self.request(Method::POST, "/api/spaces").json(&NameBody { name })).await
    }

    async fn context(&self) -> ClientResult<BoardContext> {
        Self::fetch(self.request(Method::GET, "/api/context")).await
    }

    async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        Self::fetch(self.request(Method::GET, "/api/tasks")).await
    }

    async fn create_task(&self, task: &NewTask) -> ClientResult<Task> {
        Self::fetch(self.request(Method::POST, "/api/tasks").json(task)).await
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> ClientResult<Task> {
        Self::fetch(self.request(Method::PATCH, &format!("/api/tasks/{}", id)).json(patch)).await
    }

    async fn delete_task(&self, id: i64) -> ClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/api/tasks/{}", id))).await?;
        Ok(())
    }
}
