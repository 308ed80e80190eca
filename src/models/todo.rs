use serde::{Deserialize, Serialize};

use crate::error::TaskdeckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoStatus {
    Pending,
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Todo" => Some(Self::Todo),
            "In Progress" => Some(Self::InProgress),
            "Complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub task_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TodoStatus,
    pub created_at: String,
}

/// Fields supplied by the add-todo form. New todos always start `Pending`;
/// the data layer stamps `createdAt` and the server assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub task_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TodoDraft {
    pub fn validate(&self) -> Result<(), TaskdeckError> {
        if self.task_id.is_empty() {
            return Err(TaskdeckError::validation("Todo must belong to a task"));
        }
        if self.title.trim().is_empty() {
            return Err(TaskdeckError::validation("Todo title must not be empty"));
        }
        Ok(())
    }
}

/// Partial todo update, PATCHed to the backend and applied to cached copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn status(status: TodoStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), TaskdeckError> {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                return Err(TaskdeckError::validation("Todo title must not be empty"));
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, todo: &mut TodoItem) {
        if let Some(ref title) = self.title {
            todo.title = title.clone();
        }
        if let Some(ref description) = self.description {
            todo.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}
