use chrono::{NaiveDate, Utc};

use crate::models::{Task, TaskPriority, TaskStatus};

/// Task-list filter; all set fields must match.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(ref assignee) = self.assignee {
            if &task.assignee != assignee {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Created,
    Due,
    Priority,
    Title,
}

impl SortKey {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "due" => Some(Self::Due),
            "priority" => Some(Self::Priority),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Filter and sort a cached task list for display. Sorting is stable, so
/// ties keep their fetch order (the backend's insertion order).
pub fn select<'a>(tasks: &'a [Task], filter: &TaskFilter, sort: SortKey) -> Vec<&'a Task> {
    let mut selected: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    match sort {
        SortKey::Created => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        // Tasks without a due date sort last
        SortKey::Due => selected.sort_by(|a, b| match (&a.due_date, &b.due_date) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        SortKey::Priority => selected.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::Title => {
            selected.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
    }
    selected
}

/// A task is overdue when its due date has passed and it is not done.
pub fn is_overdue(task: &Task) -> bool {
    is_overdue_on(task, Utc::now().date_naive())
}

fn is_overdue_on(task: &Task, today: NaiveDate) -> bool {
    if task.status == TaskStatus::Done {
        return false;
    }
    match task.due_date.as_deref() {
        Some(due) => NaiveDate::parse_from_str(due, "%Y-%m-%d")
            .map(|d| d < today)
            .unwrap_or(false),
        None => false,
    }
}
