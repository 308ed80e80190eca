use serde_json::json;

use crate::cli::commands::TodoCommands;
use crate::cli::open_store;
use crate::error::TaskdeckError;
use crate::models::{TaskStatus, TodoDraft, TodoPatch, TodoStatus};
use crate::output;

pub fn run(cmd: TodoCommands, json_output: bool, api_url: Option<&str>) -> i32 {
    let result = match cmd {
        TodoCommands::Add {
            task_id,
            title,
            description,
        } => run_add(&task_id, &title, description, json_output, api_url),
        TodoCommands::List { task_id } => run_list(&task_id, json_output, api_url),
        TodoCommands::Update {
            task_id,
            todo_id,
            title,
            description,
        } => run_update(&task_id, &todo_id, title, description, json_output, api_url),
        TodoCommands::Status {
            task_id,
            todo_id,
            status,
        } => run_status(&task_id, &todo_id, &status, json_output, api_url),
        TodoCommands::Delete { task_id, todo_id } => {
            run_delete(&task_id, &todo_id, json_output, api_url)
        }
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&output::json::error(&e)).unwrap());
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

fn run_add(
    task_id: &str,
    title: &str,
    description: Option<String>,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let draft = TodoDraft {
        task_id: task_id.to_string(),
        title: title.to_string(),
        description,
    };

    let mut store = open_store(api_url)?;
    let (todo, task_status) = store.add_todo(&draft)?;

    if json_output {
        print_mutation_json(json!({ "todo": output::json::todo_json(&todo) }), task_status);
    } else {
        println!("Added todo: {} ({})", todo.title, todo.id);
        print_status_note(task_status);
    }
    Ok(0)
}

fn run_list(task_id: &str, json_output: bool, api_url: Option<&str>) -> Result<i32, TaskdeckError> {
    let mut store = open_store(api_url)?;
    let task = store.task(task_id)?;

    if json_output {
        let todos: Vec<_> = task.todos.iter().map(output::json::todo_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task_id": task.id,
                "todos": todos,
                "progress": output::json::progress_json(&crate::progress::compute_progress(task)),
            })))
            .unwrap()
        );
    } else {
        output::text::print_todo_list(&task.todos);
    }
    Ok(0)
}

fn run_update(
    task_id: &str,
    todo_id: &str,
    title: Option<String>,
    description: Option<String>,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let patch = TodoPatch {
        title,
        description,
        status: None,
    };

    let mut store = open_store(api_url)?;
    let (todo, task_status) = store.update_todo(task_id, todo_id, &patch)?;

    if json_output {
        print_mutation_json(json!({ "todo": output::json::todo_json(&todo) }), task_status);
    } else {
        println!("Updated todo: {} ({})", todo.title, todo.id);
        print_status_note(task_status);
    }
    Ok(0)
}

fn run_status(
    task_id: &str,
    todo_id: &str,
    status: &str,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let status = parse_status(status)?;
    let mut store = open_store(api_url)?;
    let (todo, task_status) = store.move_todo(task_id, todo_id, status)?;

    if json_output {
        print_mutation_json(json!({ "todo": output::json::todo_json(&todo) }), task_status);
    } else {
        println!("Todo {} → {}", todo.id, todo.status.as_str());
        print_status_note(task_status);
    }
    Ok(0)
}

fn run_delete(
    task_id: &str,
    todo_id: &str,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let mut store = open_store(api_url)?;
    let task_status = store.delete_todo(task_id, todo_id)?;

    if json_output {
        print_mutation_json(json!({ "deleted": { "id": todo_id } }), task_status);
    } else {
        println!("Deleted todo: {todo_id}");
        print_status_note(task_status);
    }
    Ok(0)
}

/// Success envelope with the derived task status attached when
/// reconciliation changed it.
fn print_mutation_json(mut data: serde_json::Value, task_status: Option<TaskStatus>) {
    if let Some(status) = task_status {
        data["task_status"] = json!(status.as_str());
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&output::json::success(data)).unwrap()
    );
}

fn print_status_note(task_status: Option<TaskStatus>) {
    if let Some(status) = task_status {
        println!("Task status → {}", status.as_str());
    }
}

fn parse_status(s: &str) -> Result<TodoStatus, TaskdeckError> {
    TodoStatus::from_str(s).ok_or_else(|| {
        TaskdeckError::validation(format!(
            "Unknown todo status '{s}' (expected Pending, Todo, \"In Progress\" or Complete)"
        ))
    })
}
