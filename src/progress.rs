use serde::Serialize;

use crate::models::{Task, TaskStatus, TodoStatus};

/// Per-task todo completion, shown on cards and detail views.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn compute_progress(task: &Task) -> Progress {
    let total = task.todos.len();
    let completed = task
        .todos
        .iter()
        .filter(|t| t.status == TodoStatus::Complete)
        .count();

    if total == 0 {
        return Progress::default();
    }

    let percentage = ((completed as f64 / total as f64) * 100.0).round() as u32;
    Progress {
        completed,
        total,
        percentage,
    }
}

/// Status a task should carry given its todos. Pure function of the todo
/// statuses; a task with no todos keeps whatever was set manually.
pub fn suggest_status(task: &Task) -> TaskStatus {
    if task.todos.is_empty() {
        return task.status;
    }

    let total = task.todos.len();
    let completed = task
        .todos
        .iter()
        .filter(|t| t.status == TodoStatus::Complete)
        .count();
    let in_progress = task
        .todos
        .iter()
        .filter(|t| t.status == TodoStatus::InProgress)
        .count();

    if completed == total {
        return TaskStatus::Done;
    }
    if in_progress > 0 || completed > 0 {
        return TaskStatus::Doing;
    }
    TaskStatus::Todo
}

/// Board-level counts for the `status` command.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BoardSummary {
    pub total: usize,
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
    pub todos_total: usize,
    pub todos_completed: usize,
    pub percentage: u32,
}

pub fn board_summary(tasks: &[Task]) -> BoardSummary {
    let mut summary = BoardSummary {
        total: tasks.len(),
        ..BoardSummary::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Todo => summary.todo += 1,
            TaskStatus::Doing => summary.doing += 1,
            TaskStatus::Done => summary.done += 1,
        }
        let progress = compute_progress(task);
        summary.todos_total += progress.total;
        summary.todos_completed += progress.completed;
    }
    if summary.total > 0 {
        summary.percentage =
            ((summary.done as f64 / summary.total as f64) * 100.0).round() as u32;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TodoItem};

    fn task_with_todos(status: TaskStatus, todo_statuses: &[TodoStatus]) -> Task {
        let todos = todo_statuses
            .iter()
            .enumerate()
            .map(|(i, s)| TodoItem {
                id: format!("d{i}"),
                task_id: "t1".into(),
                title: format!("todo {i}"),
                description: None,
                status: *s,
                created_at: "2026-01-01T00:00:00.000Z".into(),
            })
            .collect();
        Task {
            id: "t1".into(),
            title: "task".into(),
            description: String::new(),
            status,
            assignee: String::new(),
            due_date: None,
            priority: TaskPriority::Medium,
            todos,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_progress_no_todos_is_all_zero() {
        let task = task_with_todos(TaskStatus::Todo, &[]);
        assert_eq!(
            compute_progress(&task),
            Progress {
                completed: 0,
                total: 0,
                percentage: 0
            }
        );
    }

    #[test]
    fn test_progress_two_of_four_is_fifty() {
        let task = task_with_todos(
            TaskStatus::Doing,
            &[
                TodoStatus::Complete,
                TodoStatus::Complete,
                TodoStatus::Pending,
                TodoStatus::Todo,
            ],
        );
        let p = compute_progress(&task);
        assert_eq!(p.completed, 2);
        assert_eq!(p.total, 4);
        assert_eq!(p.percentage, 50);
    }

    #[test]
    fn test_progress_rounds_to_nearest() {
        let task = task_with_todos(
            TaskStatus::Doing,
            &[TodoStatus::Complete, TodoStatus::Pending, TodoStatus::Pending],
        );
        assert_eq!(compute_progress(&task).percentage, 33);

        let task = task_with_todos(
            TaskStatus::Doing,
            &[TodoStatus::Complete, TodoStatus::Complete, TodoStatus::Pending],
        );
        assert_eq!(compute_progress(&task).percentage, 67);
    }

    #[test]
    fn test_suggest_keeps_manual_status_without_todos() {
        let task = task_with_todos(TaskStatus::Doing, &[]);
        assert_eq!(suggest_status(&task), TaskStatus::Doing);
    }

    #[test]
    fn test_suggest_done_when_all_complete() {
        let task = task_with_todos(
            TaskStatus::Todo,
            &[TodoStatus::Complete, TodoStatus::Complete, TodoStatus::Complete],
        );
        assert_eq!(suggest_status(&task), TaskStatus::Done);
    }

    #[test]
    fn test_suggest_doing_when_any_in_progress() {
        let task = task_with_todos(
            TaskStatus::Todo,
            &[TodoStatus::InProgress, TodoStatus::Pending, TodoStatus::Pending],
        );
        assert_eq!(suggest_status(&task), TaskStatus::Doing);
    }

    #[test]
    fn test_suggest_doing_when_partially_complete() {
        let task = task_with_todos(
            TaskStatus::Todo,
            &[TodoStatus::Complete, TodoStatus::Pending],
        );
        assert_eq!(suggest_status(&task), TaskStatus::Doing);
    }

    #[test]
    fn test_suggest_todo_when_all_pending() {
        let task = task_with_todos(
            TaskStatus::Done,
            &[TodoStatus::Pending, TodoStatus::Pending, TodoStatus::Pending],
        );
        assert_eq!(suggest_status(&task), TaskStatus::Todo);
    }

    #[test]
    fn test_suggest_is_idempotent() {
        let task = task_with_todos(
            TaskStatus::Todo,
            &[TodoStatus::InProgress, TodoStatus::Complete],
        );
        let first = suggest_status(&task);
        let mut again = task.clone();
        again.status = first;
        assert_eq!(suggest_status(&again), first);
    }

    #[test]
    fn test_board_summary_counts() {
        let tasks = vec![
            task_with_todos(TaskStatus::Done, &[TodoStatus::Complete]),
            task_with_todos(TaskStatus::Todo, &[TodoStatus::Pending, TodoStatus::Complete]),
            task_with_todos(TaskStatus::Doing, &[]),
            task_with_todos(TaskStatus::Done, &[]),
        ];
        let s = board_summary(&tasks);
        assert_eq!(s.total, 4);
        assert_eq!(s.todo, 1);
        assert_eq!(s.doing, 1);
        assert_eq!(s.done, 2);
        assert_eq!(s.todos_total, 3);
        assert_eq!(s.todos_completed, 2);
        assert_eq!(s.percentage, 50);
    }
}
