use kanban_shared::models::space::Space;
use std::sync::Arc;

use crate::api::BoardApi;

/// Spaces the user belongs to and the one currently selected
pub struct SpaceStore {
    api: Arc<dyn BoardApi>,
    spaces: Vec<Space>,
    current: Option<Space>,
    loading: bool,
    error: Option<String>,
}

impl SpaceStore {
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self {
            api,
            spaces: Vec::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn current(&self) -> Option<&Space> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the space list and selects its first entry
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list_spaces().await {
            Ok(spaces) => {
                self.current = spaces.first().cloned();
                self.spaces = spaces;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load spaces");
                self.error = Some(e.message());
            }
        }

        self.loading = false;
    }

    /// Creates a space and selects it
    ///
    /// Blank names are ignored without calling the server.
    pub async fn add(&mut self, name: &str) -> Option<Space> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.error = None;

        match self.api.create_space(name).await {
            Ok(space) => {
                self.spaces.insert(0, space.clone());
                self.current = Some(space.clone());
                Some(space)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create space");
                self.error = Some(e.message());
                None
            }
        }
    }

    /// Selects a loaded space; unknown ids leave the selection unchanged
    pub fn select(&mut self, space_id: i64) -> bool {
        match self.spaces.iter().find(|space| space.id == space_id) {
            Some(space) => {
                self.current = Some(space.clone());
                true
            }
            None => false,
        }
    }
}
