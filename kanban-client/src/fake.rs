//! In-memory [`BoardApi`] used by store tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kanban_shared::models::{
    column::Column,
    project::Project,
    space::Space,
    task::Task,
    user::User,
};
use std::sync::Mutex;

use crate::{
    api::{BoardApi, BoardContext, NewTask, TaskPatch},
    error::{ClientError, ClientResult},
};

#[derive(Default)]
struct State {
    spaces: Vec<Space>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    next_id: i64,
    fail_next: Option<(u16, String)>,
    calls: usize,
}

pub struct FakeApi {
    state: Mutex<State>,
}

pub fn timestamp(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap()
}

pub fn column(id: i64, name: &str, position: i32) -> Column {
    Column {
        id,
        project_id: 1,
        name: name.to_string(),
        position,
        created_at: timestamp(0),
    }
}

pub fn task(id: i64, title: &str, status: &str) -> Task {
    Task {
        id,
        project_id: 1,
        column_id: 0,
        title: title.to_string(),
        description: None,
        ticket: None,
        team: None,
        assignee: None,
        start_date: None,
        due_date: None,
        priority: Default::default(),
        created_at: timestamp(id),
        status: status.to_string(),
    }
}

pub fn space(id: i64, name: &str) -> Space {
    Space {
        id,
        name: name.to_string(),
        created_at: timestamp(id),
    }
}

impl FakeApi {
    /// A board with the default columns and no tasks
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                columns: vec![column(10, "todo", 0), column(11, "doing", 1), column(12, "done", 2)],
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn with_spaces(self, spaces: Vec<Space>) -> Self {
        self.state.lock().unwrap().spaces = spaces;
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.state.lock().unwrap().tasks = tasks;
        self
    }

    /// Makes the next call fail with an API error
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state.lock().unwrap().fail_next = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn begin(&self) -> ClientResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        match state.fail_next.take() {
            Some((status, message)) => Err(ClientError::Api { status, message }),
            None => Ok(state),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "Task not found".to_string(),
    }
}

fn invalid_status() -> ClientError {
    ClientError::Api {
        status: 400,
        message: "Invalid status".to_string(),
    }
}

#[async_trait]
impl BoardApi for FakeApi {
    async fn list_spaces(&self) -> ClientResult<Vec<Space>> {
        Ok(self.begin()?.spaces.clone())
    }

    async fn create_space(&self, name: &str) -> ClientResult<Space> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let created = space(state.next_id, name);
        state.spaces.push(created.clone());
        Ok(created)
    }

    async fn context(&self) -> ClientResult<BoardContext> {
        let state = self.begin()?;
        Ok(BoardContext {
            user: User {
                id: 1,
                email: "demo@local".to_string(),
                name: Some("demo".to_string()),
                created_at: timestamp(0),
            },
            space: space(1, "My Space"),
            project: Project {
                id: 1,
                space_id: 1,
                name: "Default".to_string(),
                created_at: timestamp(0),
            },
            columns: state.columns.clone(),
            column_by_name: state
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.clone()))
                .collect(),
        })
    }

    async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        Ok(self.begin()?.tasks.clone())
    }

    async fn create_task(&self, new: &NewTask) -> ClientResult<Task> {
        let mut state = self.begin()?;
        let status = new.status.clone().unwrap_or_else(|| "todo".to_string());
        let column_id = state
            .columns
            .iter()
            .find(|c| c.name == status)
            .map(|c| c.id)
            .ok_or_else(invalid_status)?;

        state.next_id += 1;
        let mut created = task(state.next_id, &new.title, &status);
        created.column_id = column_id;
        created.ticket = new.ticket.clone();
        created.start_date = new.start_date;
        state.tasks.insert(0, created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> ClientResult<Task> {
        let mut state = self.begin()?;
        let column = match &patch.status {
            Some(status) => Some(
                state
                    .columns
                    .iter()
                    .find(|c| &c.name == status)
                    .cloned()
                    .ok_or_else(invalid_status)?,
            ),
            None => None,
        };

        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(not_found)?;
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(column) = column {
            task.column_id = column.id;
            task.status = column.name;
        }
        if let Some(assignee) = &patch.assignee {
            task.assignee = assignee.clone();
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> ClientResult<()> {
        let mut state = self.begin()?;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
