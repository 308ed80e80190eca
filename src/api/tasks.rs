use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::now_timestamp;
use crate::error::TaskdeckError;
use crate::models::{Task, TaskDraft, TaskPatch, TodoItem};

pub fn fetch_all(client: &ApiClient) -> Result<Vec<Task>, TaskdeckError> {
    client.get_json("/tasks")
}

pub fn fetch_one(client: &ApiClient, id: &str) -> Result<Task, TaskdeckError> {
    client
        .get_json(&format!("/tasks/{id}"))
        .map_err(|e| match e.http_status {
            Some(404) => TaskdeckError::task_not_found(id),
            _ => e,
        })
}

/// POST a new task. `createdAt` is stamped here and the todo list starts
/// empty; the server assigns the id.
pub fn create(client: &ApiClient, draft: &TaskDraft) -> Result<Task, TaskdeckError> {
    let body = CreateTaskBody {
        draft,
        todos: Vec::new(),
        created_at: now_timestamp(),
    };
    client.post_json("/tasks", &body)
}

pub fn update(client: &ApiClient, id: &str, patch: &TaskPatch) -> Result<Task, TaskdeckError> {
    client
        .patch_json(&format!("/tasks/{id}"), patch)
        .map_err(|e| match e.http_status {
            Some(404) => TaskdeckError::task_not_found(id),
            _ => e,
        })
}

pub fn delete(client: &ApiClient, id: &str) -> Result<(), TaskdeckError> {
    client
        .delete(&format!("/tasks/{id}"))
        .map_err(|e| match e.http_status {
            Some(404) => TaskdeckError::task_not_found(id),
            _ => e,
        })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskBody<'a> {
    #[serde(flatten)]
    draft: &'a TaskDraft,
    todos: Vec<TodoItem>,
    created_at: String,
}
