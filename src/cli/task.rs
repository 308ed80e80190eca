use std::io::{self, BufRead, Write};

use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::open_store;
use crate::error::TaskdeckError;
use crate::models::{TaskDraft, TaskPatch, TaskPriority, TaskStatus};
use crate::output;
use crate::view::{self, SortKey, TaskFilter};

pub fn run(cmd: TaskCommands, json_output: bool, api_url: Option<&str>) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            status,
            assignee,
            due,
            priority,
        } => run_add(
            &title,
            &description,
            &status,
            &assignee,
            due,
            &priority,
            json_output,
            api_url,
        ),
        TaskCommands::List {
            status,
            priority,
            assignee,
            sort,
        } => run_list(
            status.as_deref(),
            priority.as_deref(),
            assignee,
            &sort,
            json_output,
            api_url,
        ),
        TaskCommands::Show { id } => run_show(&id, json_output, api_url),
        TaskCommands::Update {
            id,
            title,
            description,
            assignee,
            due,
            priority,
        } => run_update(&id, title, description, assignee, due, priority, json_output, api_url),
        TaskCommands::Status { id, status } => run_status(&id, &status, json_output, api_url),
        TaskCommands::Delete { id, yes } => run_delete(&id, yes, json_output, api_url),
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

#[allow(clippy::too_many_arguments)]
fn run_add(
    title: &str,
    description: &str,
    status: &str,
    assignee: &str,
    due: Option<String>,
    priority: &str,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let draft = TaskDraft {
        title: title.to_string(),
        description: description.to_string(),
        status: parse_status(status)?,
        assignee: assignee.to_string(),
        due_date: due,
        priority: parse_priority(priority)?,
    };

    let mut store = open_store(api_url)?;
    let task = store.create_task(&draft)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_summary(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_list(
    status: Option<&str>,
    priority: Option<&str>,
    assignee: Option<String>,
    sort: &str,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let filter = TaskFilter {
        status: status.map(parse_status).transpose()?,
        priority: priority.map(parse_priority).transpose()?,
        assignee,
    };
    let sort = SortKey::from_str(sort).ok_or_else(|| {
        TaskdeckError::validation(format!(
            "Unknown sort key '{sort}' (expected created, due, priority or title)"
        ))
    })?;

    let mut store = open_store(api_url)?;
    let tasks = store.tasks()?;
    let selected = view::select(tasks, &filter, sort);

    if json_output {
        let tasks_json: Vec<_> = selected
            .iter()
            .map(|t| {
                let mut v = output::json::task_summary(t);
                v["progress"] =
                    output::json::progress_json(&crate::progress::compute_progress(t));
                v
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "tasks": tasks_json,
                "count": selected.len()
            })))
            .unwrap()
        );
    } else {
        output::text::print_task_list(&selected);
    }
    Ok(0)
}

fn run_show(id: &str, json_output: bool, api_url: Option<&str>) -> Result<i32, TaskdeckError> {
    let mut store = open_store(api_url)?;
    let task = store.task(id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(task);
    }
    Ok(0)
}

#[allow(clippy::too_many_arguments)]
fn run_update(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let patch = TaskPatch {
        title,
        description,
        status: None,
        assignee,
        due_date: due,
        priority: priority.as_deref().map(parse_priority).transpose()?,
    };

    let mut store = open_store(api_url)?;
    let task = store.update_task(id, &patch)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_summary(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_status(
    id: &str,
    status: &str,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let status = parse_status(status)?;
    let mut store = open_store(api_url)?;
    let task = store.set_task_status(id, status)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_summary(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Task {} → {}", task.id, task.status.as_str());
    }
    Ok(0)
}

fn run_delete(
    id: &str,
    yes: bool,
    json_output: bool,
    api_url: Option<&str>,
) -> Result<i32, TaskdeckError> {
    let mut store = open_store(api_url)?;
    let task = store.task(id)?.clone();

    if !yes {
        if json_output {
            return Err(TaskdeckError::validation(
                "Deletion requires --yes with --json output",
            ));
        }
        if !confirm(&format!(
            "Delete task '{}' and its {} todo(s)? [y/N]: ",
            task.title,
            task.todos.len()
        ))? {
            println!("Aborted.");
            return Ok(0);
        }
    }

    store.delete_task(id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": { "id": task.id, "title": task.title }
            })))
            .unwrap()
        );
    } else {
        println!("Deleted task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn confirm(prompt: &str) -> Result<bool, TaskdeckError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|e| TaskdeckError::validation(e.to_string()))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| TaskdeckError::validation(e.to_string()))?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn parse_status(s: &str) -> Result<TaskStatus, TaskdeckError> {
    TaskStatus::from_str(s).ok_or_else(|| {
        TaskdeckError::validation(format!(
            "Unknown task status '{s}' (expected Todo, Doing or Done)"
        ))
    })
}

fn parse_priority(s: &str) -> Result<TaskPriority, TaskdeckError> {
    TaskPriority::from_str(s).ok_or_else(|| {
        TaskdeckError::validation(format!(
            "Unknown priority '{s}' (expected Low, Medium or High)"
        ))
    })
}
