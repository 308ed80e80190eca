use serde::Serialize;

use crate::api::client::ApiClient;
use crate::api::now_timestamp;
use crate::error::TaskdeckError;
use crate::models::{TodoDraft, TodoItem, TodoPatch, TodoStatus};

pub fn fetch_all(client: &ApiClient) -> Result<Vec<TodoItem>, TaskdeckError> {
    client.get_json("/todos")
}

/// POST a new todo. New todos start `Pending`; `createdAt` is stamped here
/// and the server assigns the id.
pub fn create(client: &ApiClient, draft: &TodoDraft) -> Result<TodoItem, TaskdeckError> {
    let body = CreateTodoBody {
        draft,
        status: TodoStatus::Pending,
        created_at: now_timestamp(),
    };
    client.post_json("/todos", &body)
}

pub fn update(client: &ApiClient, id: &str, patch: &TodoPatch) -> Result<TodoItem, TaskdeckError> {
    client
        .patch_json(&format!("/todos/{id}"), patch)
        .map_err(|e| match e.http_status {
            Some(404) => TaskdeckError::todo_not_found(id),
            _ => e,
        })
}

pub fn delete(client: &ApiClient, id: &str) -> Result<(), TaskdeckError> {
    client
        .delete(&format!("/todos/{id}"))
        .map_err(|e| match e.http_status {
            Some(404) => TaskdeckError::todo_not_found(id),
            _ => e,
        })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoBody<'a> {
    #[serde(flatten)]
    draft: &'a TodoDraft,
    status: TodoStatus,
    created_at: String,
}
