use serde_json::{json, Value};

use crate::error::TaskdeckError;
use crate::models::{Task, TodoItem};
use crate::progress::{self, BoardSummary, Progress};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskdeckError) -> Value {
    let mut e = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if let Some(status) = err.http_status {
        e["http_status"] = json!(status);
    }
    json!({
        "success": false,
        "error": e
    })
}

pub fn task_summary(t: &Task) -> Value {
    let mut v = json!({
        "id": t.id,
        "title": t.title,
        "status": t.status.as_str(),
        "priority": t.priority.as_str()
    });
    if !t.assignee.is_empty() {
        v["assignee"] = json!(t.assignee);
    }
    if let Some(ref due) = t.due_date {
        v["due_date"] = json!(due);
    }
    v
}

pub fn task_detail(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "status": t.status.as_str(),
        "assignee": t.assignee,
        "due_date": t.due_date,
        "priority": t.priority.as_str(),
        "created_at": t.created_at,
        "todos": t.todos.iter().map(todo_json).collect::<Vec<_>>(),
        "progress": progress_json(&progress::compute_progress(t)),
    })
}

pub fn todo_json(todo: &TodoItem) -> Value {
    json!({
        "id": todo.id,
        "task_id": todo.task_id,
        "title": todo.title,
        "description": todo.description,
        "status": todo.status.as_str(),
        "created_at": todo.created_at
    })
}

pub fn progress_json(p: &Progress) -> Value {
    json!({
        "completed": p.completed,
        "total": p.total,
        "percentage": p.percentage
    })
}

pub fn board_summary_json(s: &BoardSummary) -> Value {
    json!({
        "total": s.total,
        "todo": s.todo,
        "doing": s.doing,
        "done": s.done,
        "todos_total": s.todos_total,
        "todos_completed": s.todos_completed,
        "percentage": s.percentage
    })
}
