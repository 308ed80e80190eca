use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TaskdeckError;
use crate::models::TodoItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Doing => "Doing",
            Self::Done => "Done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Todo" => Some(Self::Todo),
            "Doing" => Some(Self::Doing),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    /// Numeric rank for sorting: High sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: TaskPriority,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    pub created_at: String,
}

/// Fields supplied by the add-task form. The server assigns the id;
/// `createdAt` and the empty `todos` list are stamped by the data layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assignee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: TaskPriority,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<(), TaskdeckError> {
        if self.title.trim().is_empty() {
            return Err(TaskdeckError::validation("Task title must not be empty"));
        }
        if let Some(ref due) = self.due_date {
            validate_due_date(due)?;
        }
        Ok(())
    }
}

/// Partial task update, PATCHed to the backend and applied to cached copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
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
                return Err(TaskdeckError::validation("Task title must not be empty"));
            }
        }
        if let Some(ref due) = self.due_date {
            validate_due_date(due)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(ref assignee) = self.assignee {
            task.assignee = assignee.clone();
        }
        if let Some(ref due) = self.due_date {
            task.due_date = Some(due.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

fn validate_due_date(due: &str) -> Result<(), TaskdeckError> {
    NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            TaskdeckError::validation(format!("Invalid due date '{due}' (expected YYYY-MM-DD)"))
        })
}
