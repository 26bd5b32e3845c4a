use kanban_shared::models::{column::Column, task::Task};
use std::sync::Arc;

use crate::{
    api::{BoardApi, NewTask, TaskPatch},
    error::ClientError,
};

/// One column with the tasks shown in it
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
}

/// Columns and tasks of the caller's default board
pub struct BoardStore {
    api: Arc<dyn BoardApi>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl BoardStore {
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self {
            api,
            columns: Vec::new(),
            tasks: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Ordered by position
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Fetches the board context and its task list
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        let result = match self.api.context().await {
            Ok(context) => self
                .api
                .list_tasks()
                .await
                .map(|tasks| (context.columns, tasks)),
            Err(e) => Err(e),
        };

        match result {
            Ok((columns, tasks)) => {
                self.columns = columns;
                self.tasks = tasks;
            }
            Err(e) => self.fail("load board", e),
        }

        self.loading = false;
    }

    /// Creates a task and puts it at the top of the list
    ///
    /// A blank title is ignored without calling the server.
    pub async fn create(&mut self, mut task: NewTask) -> Option<Task> {
        task.title = task.title.trim().to_string();
        if task.title.is_empty() {
            return None;
        }

        match self.api.create_task(&task).await {
            Ok(created) => {
                self.tasks.insert(0, created.clone());
                Some(created)
            }
            Err(e) => {
                self.fail("create task", e);
                None
            }
        }
    }

    /// Moves a task to the column named `status`
    pub async fn move_to(&mut self, task_id: i64, status: &str) -> Option<Task> {
        self.update(task_id, TaskPatch::status(status)).await
    }

    /// Applies a patch and replaces the task in place
    pub async fn update(&mut self, task_id: i64, patch: TaskPatch) -> Option<Task> {
        match self.api.update_task(task_id, &patch).await {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                    *slot = updated.clone();
                }
                Some(updated)
            }
            Err(e) => {
                self.fail("update task", e);
                None
            }
        }
    }

    /// Deletes a task and drops it from the list
    pub async fn delete(&mut self, task_id: i64) -> bool {
        match self.api.delete_task(task_id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != task_id);
                true
            }
            Err(e) => {
                self.fail("delete task", e);
                false
            }
        }
    }

    /// Tasks grouped by column, in column order
    ///
    /// A task whose status matches no column is shown in the first column.
    pub fn grouped(&self) -> Vec<ColumnGroup<'_>> {
        let mut groups: Vec<ColumnGroup<'_>> = self
            .columns
            .iter()
            .map(|column| ColumnGroup {
                column,
                tasks: Vec::new(),
            })
            .collect();

        if groups.is_empty() {
            return groups;
        }

        for task in &self.tasks {
            let index = groups
                .iter()
                .position(|group| group.column.name == task.status)
                .unwrap_or(0);
            groups[index].tasks.push(task);
        }

        groups
    }

    fn fail(&mut self, action: &str, error: ClientError) {
        tracing::warn!(error = %error, "Failed to {}", action);
        self.error = Some(error.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{task, FakeApi};

    fn store(api: FakeApi) -> (Arc<FakeApi>, BoardStore) {
        let api = Arc::new(api);
        (api.clone(), BoardStore::new(api))
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_load() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![task(2, "B", "doing"), task(1, "A", "todo")]));

        store.load().await;

        let names: Vec<&str> = store.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["todo", "doing", "done"]);
        assert_eq!(store.tasks().len(), 2);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let (api, mut store) = store(FakeApi::new());
        api.fail_next(500, "An internal error occurred");

        store.load().await;

        assert_eq!(store.error(), Some("An internal error occurred"));
        assert!(store.columns().is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![task(1, "Old", "todo")]));
        store.load().await;

        let created = store
            .create(NewTask::new("  New  ").with_status("doing"))
            .await
            .unwrap();

        assert_eq!(created.title, "New");
        assert_eq!(created.status, "doing");
        assert_eq!(store.tasks()[0].id, created.id);
        assert_eq!(store.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_create_blank_title_is_ignored() {
        let (api, mut store) = store(FakeApi::new());

        assert!(store.create(NewTask::new("   ")).await.is_none());
        assert_eq!(api.calls(), 0);
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_leaves_list() {
        let (_, mut store) = store(FakeApi::new());
        store.load().await;

        assert!(store
            .create(NewTask::new("Lost").with_status("blocked"))
            .await
            .is_none());
        assert_eq!(store.error(), Some("Invalid status"));
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_move_replaces_in_place() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![
            task(3, "C", "todo"),
            task(2, "B", "todo"),
            task(1, "A", "todo"),
        ]));
        store.load().await;

        let moved = store.move_to(2, "done").await.unwrap();

        assert_eq!(moved.status, "done");
        let ids: Vec<i64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, [3, 2, 1]);
        assert_eq!(store.tasks()[1].status, "done");
    }

    #[tokio::test]
    async fn test_update_failure_sets_error() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![task(1, "A", "todo")]));
        store.load().await;

        assert!(store.move_to(1, "archived").await.is_none());
        assert_eq!(store.error(), Some("Invalid status"));
        assert_eq!(store.tasks()[0].status, "todo");

        store.clear_error();
        let patch = TaskPatch {
            assignee: Some(Some("ana".to_string())),
            ..Default::default()
        };
        let updated = store.update(1, patch).await.unwrap();
        assert_eq!(updated.assignee.as_deref(), Some("ana"));
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![task(2, "B", "todo"), task(1, "A", "todo")]));
        store.load().await;

        assert!(store.delete(2).await);
        assert_eq!(store.tasks().len(), 1);

        assert!(!store.delete(2).await);
        assert_eq!(store.error(), Some("Task not found"));
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_grouping_follows_column_order() {
        let (_, mut store) = store(FakeApi::new().with_tasks(vec![
            task(4, "D", "done"),
            task(3, "C", "mystery"),
            task(2, "B", "doing"),
            task(1, "A", "todo"),
        ]));
        store.load().await;

        let groups = store.grouped();
        let names: Vec<&str> = groups.iter().map(|g| g.column.name.as_str()).collect();
        assert_eq!(names, ["todo", "doing", "done"]);
        assert_eq!(titles(&groups[0].tasks), ["C", "A"]);
        assert_eq!(titles(&groups[1].tasks), ["B"]);
        assert_eq!(titles(&groups[2].tasks), ["D"]);
    }

    #[test]
    fn test_grouping_without_columns_is_empty() {
        let store = BoardStore::new(Arc::new(FakeApi::new()));
        assert!(store.grouped().is_empty());
    }
}
