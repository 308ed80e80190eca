use std::collections::HashMap;

use crate::models::Task;

/// In-memory query cache: one entry for the full task list and one per
/// single-task detail view. The store owns the only instance; there is no
/// global state. Invariant: a task cached in both places holds the same
/// data, which is why [`QueryCache::patch_task`] edits every copy.
#[derive(Debug, Default)]
pub struct QueryCache {
    task_list: Option<Vec<Task>>,
    task_detail: HashMap<String, Task>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_list(&self) -> Option<&[Task]> {
        self.task_list.as_deref()
    }

    pub fn task_detail(&self, id: &str) -> Option<&Task> {
        self.task_detail.get(id)
    }

    /// Look up a task in either cache entry, detail first.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.task_detail
            .get(id)
            .or_else(|| self.task_list.as_ref()?.iter().find(|t| t.id == id))
    }

    /// Replace the list entry. Detail entries are refreshed from the new
    /// list, and detail entries for tasks no longer present are dropped.
    pub fn put_list(&mut self, tasks: Vec<Task>) {
        self.task_detail.retain(|id, _| tasks.iter().any(|t| &t.id == id));
        for task in &tasks {
            if self.task_detail.contains_key(&task.id) {
                self.task_detail.insert(task.id.clone(), task.clone());
            }
        }
        self.task_list = Some(tasks);
    }

    /// Insert or replace a detail entry, mirroring it into the list entry.
    pub fn put_detail(&mut self, task: Task) {
        if let Some(list) = self.task_list.as_mut() {
            if let Some(slot) = list.iter_mut().find(|t| t.id == task.id) {
                *slot = task.clone();
            }
        }
        self.task_detail.insert(task.id.clone(), task);
    }

    /// Apply an in-place edit to every cached copy of the task. Returns
    /// whether any copy was touched.
    pub fn patch_task(&mut self, id: &str, mut edit: impl FnMut(&mut Task)) -> bool {
        let mut touched = false;
        if let Some(list) = self.task_list.as_mut() {
            if let Some(task) = list.iter_mut().find(|t| t.id == id) {
                edit(task);
                touched = true;
            }
        }
        if let Some(task) = self.task_detail.get_mut(id) {
            edit(task);
            touched = true;
        }
        touched
    }

    /// Drop the task from every cache entry.
    pub fn remove_task(&mut self, id: &str) {
        if let Some(list) = self.task_list.as_mut() {
            list.retain(|t| t.id != id);
        }
        self.task_detail.remove(id);
    }

    pub fn invalidate_list(&mut self) {
        self.task_list = None;
    }

    pub fn invalidate_detail(&mut self, id: &str) {
        self.task_detail.remove(id);
    }
}
