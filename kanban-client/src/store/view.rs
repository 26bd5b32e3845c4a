use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A way of looking at the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    List,
    Board,
    Timeline,
    Dashboard,
}

impl View {
    /// Tab order
    pub const ALL: [View; 4] = [View::List, View::Board, View::Timeline, View::Dashboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::List => "list",
            View::Board => "board",
            View::Timeline => "timeline",
            View::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown view: {}", s))
    }
}

/// Holds the active view tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStore {
    active: View,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn set_active(&mut self, view: View) {
        self.active = view;
    }
}
