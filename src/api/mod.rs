pub mod client;
pub mod tasks;
pub mod todos;

pub use client::ApiClient;

use chrono::{SecondsFormat, Utc};

use crate::error::TaskdeckError;
use crate::models::{Task, TaskDraft, TaskPatch, TodoDraft, TodoItem, TodoPatch};

/// ISO-8601 UTC timestamp with millisecond precision, the backend's
/// `createdAt` format.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The data-access contract the store runs against. Production code uses
/// the HTTP-backed [`ApiClient`]; tests inject an in-memory double.
pub trait Backend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, TaskdeckError>;
    fn fetch_task(&self, id: &str) -> Result<Task, TaskdeckError>;
    fn fetch_todos(&self) -> Result<Vec<TodoItem>, TaskdeckError>;
    fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskdeckError>;
    fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, TaskdeckError>;
    fn delete_task(&self, id: &str) -> Result<(), TaskdeckError>;
    fn create_todo(&self, draft: &TodoDraft) -> Result<TodoItem, TaskdeckError>;
    fn update_todo(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem, TaskdeckError>;
    fn delete_todo(&self, id: &str) -> Result<(), TaskdeckError>;
}

impl Backend for ApiClient {
    fn fetch_tasks(&self) -> Result<Vec<Task>, TaskdeckError> {
        tasks::fetch_all(self)
    }

    fn fetch_task(&self, id: &str) -> Result<Task, TaskdeckError> {
        tasks::fetch_one(self, id)
    }

    fn fetch_todos(&self) -> Result<Vec<TodoItem>, TaskdeckError> {
        todos::fetch_all(self)
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskdeckError> {
        tasks::create(self, draft)
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, TaskdeckError> {
        tasks::update(self, id, patch)
    }

    fn delete_task(&self, id: &str) -> Result<(), TaskdeckError> {
        tasks::delete(self, id)
    }

    fn create_todo(&self, draft: &TodoDraft) -> Result<TodoItem, TaskdeckError> {
        todos::create(self, draft)
    }

    fn update_todo(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem, TaskdeckError> {
        todos::update(self, id, patch)
    }

    fn delete_todo(&self, id: &str) -> Result<(), TaskdeckError> {
        todos::delete(self, id)
    }
}
