use crate::models::{Task, TodoItem};
use crate::progress::{self, BoardSummary, Progress};
use crate::view;

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    if !t.description.is_empty() {
        println!("  Description: {}", t.description);
    }
    println!("  Status: {}", t.status.as_str());
    println!("  Priority: {}", t.priority.as_str());
    if !t.assignee.is_empty() {
        println!("  Assignee: {}", t.assignee);
    }
    if let Some(ref due) = t.due_date {
        let overdue = if view::is_overdue(t) { " (overdue)" } else { "" };
        println!("  Due: {due}{overdue}");
    }
    println!("  Created: {}", t.created_at);
    if !t.todos.is_empty() {
        print_progress(&progress::compute_progress(t));
        println!("  Todos:");
        for todo in &t.todos {
            print_todo_line(todo);
        }
    }
}

pub fn print_task_list(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let p = progress::compute_progress(t);
        let todos = if p.total > 0 {
            format!(" {}/{}", p.completed, p.total)
        } else {
            String::new()
        };
        let assignee = if t.assignee.is_empty() {
            String::new()
        } else {
            format!(" @{}", t.assignee)
        };
        let overdue = if view::is_overdue(t) { " !overdue" } else { "" };
        println!(
            "  [{}] {} ({}) {}{}{}{}",
            t.status.as_str(),
            t.title,
            &t.id[..std::cmp::min(8, t.id.len())],
            t.priority.as_str(),
            todos,
            assignee,
            overdue,
        );
    }
}

pub fn print_todo_line(todo: &TodoItem) {
    println!(
        "    [{}] {} ({})",
        todo.status.as_str(),
        todo.title,
        &todo.id[..std::cmp::min(8, todo.id.len())]
    );
}

pub fn print_todo_list(todos: &[TodoItem]) {
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }
    for todo in todos {
        print_todo_line(todo);
    }
}

pub fn print_progress(p: &Progress) {
    println!("  Progress: {}% ({}/{})", p.percentage, p.completed, p.total);
}

pub fn print_board_summary(s: &BoardSummary) {
    println!("Tasks: {} ({}% done)", s.total, s.percentage);
    println!("  todo={} doing={} done={}", s.todo, s.doing, s.done);
    println!("  Todos: {}/{} complete", s.todos_completed, s.todos_total);
}
