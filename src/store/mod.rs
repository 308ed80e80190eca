pub mod cache;

pub use cache::QueryCache;

use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::error::TaskdeckError;
use crate::models::{
    Task, TaskDraft, TaskPatch, TaskStatus, TodoDraft, TodoItem, TodoPatch, TodoStatus,
};
use crate::progress;

/// Client-side store over the REST backend: serves reads from the query
/// cache, applies mutations optimistically, and keeps task status aligned
/// with todo state.
///
/// Mutation contract (per operation kind):
/// - create: backend call first, then invalidate + refetch. No optimistic
///   insert; the caller tolerates the round-trip for creation.
/// - update/delete: the cached copies are patched before the backend call,
///   so any reader of the store sees the effect immediately. On failure the
///   optimistic state is discarded by refetching from the backend and the
///   error propagates to the caller.
///
/// Every todo mutation ends with an explicit [`reconcile`](Self::reconcile)
/// step; there is no implicit change-watching.
pub struct TaskStore<B: Backend> {
    backend: B,
    cache: QueryCache,
}

impl<B: Backend> TaskStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
        }
    }

    /// Read-only view of the cache, for inspection in tests.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ── reads ──────────────────────────────────────────────────────

    /// All tasks with their todos joined on, from cache or a fresh fetch.
    pub fn tasks(&mut self) -> Result<&[Task], TaskdeckError> {
        if self.cache.task_list().is_none() {
            self.load_list()?;
        }
        Ok(self.cache.task_list().unwrap_or(&[]))
    }

    /// Single task detail view, from cache or a fresh fetch.
    pub fn task(&mut self, id: &str) -> Result<&Task, TaskdeckError> {
        if self.cache.task_detail(id).is_none() {
            let task = self.fetch_detail(id)?;
            self.cache.put_detail(task);
        }
        self.cache
            .task_detail(id)
            .ok_or_else(|| TaskdeckError::task_not_found(id))
    }

    /// Force both cache entries to refetch on next read.
    pub fn refresh(&mut self) -> Result<(), TaskdeckError> {
        self.cache.invalidate_list();
        self.load_list()
    }

    // ── task mutations ─────────────────────────────────────────────

    pub fn create_task(&mut self, draft: &TaskDraft) -> Result<Task, TaskdeckError> {
        draft.validate()?;
        let created = self.backend.create_task(draft)?;
        self.refetch_after_create(&created.id)?;
        Ok(created)
    }

    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<Task, TaskdeckError> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(TaskdeckError::validation("Nothing to update"));
        }
        self.task(id)?;

        debug!(task = id, "applying optimistic task patch");
        self.cache.patch_task(id, |t| patch.apply_to(t));

        if let Err(e) = self.backend.update_task(id, patch) {
            self.rollback(id);
            return Err(e);
        }
        self.current_task(id)
    }

    pub fn set_task_status(
        &mut self,
        id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskdeckError> {
        self.update_task(id, &TaskPatch::status(status))
    }

    /// Delete a task and its todos. The todos go first so the backend never
    /// holds a todo whose task is gone.
    pub fn delete_task(&mut self, id: &str) -> Result<(), TaskdeckError> {
        let task = self.task(id)?.clone();

        debug!(task = id, "applying optimistic task delete");
        self.cache.remove_task(id);

        let result = (|| -> Result<(), TaskdeckError> {
            for todo in &task.todos {
                self.backend.delete_todo(&todo.id)?;
            }
            self.backend.delete_task(id)
        })();

        if let Err(e) = result {
            self.rollback(id);
            return Err(e);
        }
        Ok(())
    }

    // ── todo mutations ─────────────────────────────────────────────

    /// Create a todo under its task. Returns the created todo and the
    /// task's new status when reconciliation changed it.
    pub fn add_todo(
        &mut self,
        draft: &TodoDraft,
    ) -> Result<(TodoItem, Option<TaskStatus>), TaskdeckError> {
        draft.validate()?;
        let task_id = draft.task_id.clone();
        self.task(&task_id)?;

        let created = self.backend.create_todo(draft)?;
        self.refetch_after_create(&task_id)?;
        let changed = self.reconcile(&task_id)?;
        Ok((created, changed))
    }

    pub fn update_todo(
        &mut self,
        task_id: &str,
        todo_id: &str,
        patch: &TodoPatch,
    ) -> Result<(TodoItem, Option<TaskStatus>), TaskdeckError> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(TaskdeckError::validation("Nothing to update"));
        }
        self.require_todo(task_id, todo_id)?;

        debug!(task = task_id, todo = todo_id, "applying optimistic todo patch");
        self.cache.patch_task(task_id, |t| {
            if let Some(todo) = t.todos.iter_mut().find(|td| td.id == todo_id) {
                patch.apply_to(todo);
            }
        });

        if let Err(e) = self.backend.update_todo(todo_id, patch) {
            self.rollback(task_id);
            return Err(e);
        }

        let changed = self.reconcile(task_id)?;
        let todo = self.current_todo(task_id, todo_id)?;
        Ok((todo, changed))
    }

    pub fn move_todo(
        &mut self,
        task_id: &str,
        todo_id: &str,
        status: TodoStatus,
    ) -> Result<(TodoItem, Option<TaskStatus>), TaskdeckError> {
        self.update_todo(task_id, todo_id, &TodoPatch::status(status))
    }

    pub fn delete_todo(
        &mut self,
        task_id: &str,
        todo_id: &str,
    ) -> Result<Option<TaskStatus>, TaskdeckError> {
        self.require_todo(task_id, todo_id)?;

        debug!(task = task_id, todo = todo_id, "applying optimistic todo delete");
        self.cache.patch_task(task_id, |t| {
            t.todos.retain(|td| td.id != todo_id);
        });

        if let Err(e) = self.backend.delete_todo(todo_id) {
            self.rollback(task_id);
            return Err(e);
        }

        self.reconcile(task_id)
    }

    // ── derived status ─────────────────────────────────────────────

    /// One-way pull from todo state to task status: a task with at least
    /// one todo gets the derived suggestion whenever it diverges from the
    /// stored status. Tasks with no todos keep their manually-set status.
    pub fn reconcile(&mut self, task_id: &str) -> Result<Option<TaskStatus>, TaskdeckError> {
        let (current, suggested) = match self.cache.get(task_id) {
            Some(task) if !task.todos.is_empty() => {
                (task.status, progress::suggest_status(task))
            }
            _ => return Ok(None),
        };
        if suggested == current {
            return Ok(None);
        }
        info!(
            task = task_id,
            from = current.as_str(),
            to = suggested.as_str(),
            "derived status diverged, updating task"
        );
        self.set_task_status(task_id, suggested)?;
        Ok(Some(suggested))
    }

    // ── internals ──────────────────────────────────────────────────

    /// Fetch `/tasks` and `/todos` and join todos onto their parent task.
    fn load_list(&mut self) -> Result<(), TaskdeckError> {
        let tasks = self.backend.fetch_tasks()?;
        let todos = self.backend.fetch_todos()?;
        self.cache.put_list(join_todos(tasks, todos));
        Ok(())
    }

    fn fetch_detail(&self, id: &str) -> Result<Task, TaskdeckError> {
        let mut task = self.backend.fetch_task(id)?;
        let todos = self.backend.fetch_todos()?;
        task.todos = todos.into_iter().filter(|t| t.task_id == task.id).collect();
        Ok(task)
    }

    /// Invalidate the entries touched by a create and refetch them.
    fn refetch_after_create(&mut self, task_id: &str) -> Result<(), TaskdeckError> {
        self.cache.invalidate_detail(task_id);
        self.cache.invalidate_list();
        self.load_list()?;
        let fresh = self
            .cache
            .task_list()
            .and_then(|list| list.iter().find(|t| t.id == task_id))
            .cloned();
        if let Some(task) = fresh {
            self.cache.put_detail(task);
        }
        Ok(())
    }

    /// Discard optimistic state after a failed mutation by refetching both
    /// cache entries from the backend. If the refetch itself fails the
    /// caches are left cold, which is still consistent: the next read
    /// fetches fresh data.
    fn rollback(&mut self, task_id: &str) {
        warn!(task = task_id, "mutation failed, discarding optimistic state");
        self.cache.invalidate_detail(task_id);
        self.cache.invalidate_list();
        if let Err(e) = self.load_list() {
            warn!(error = %e, "rollback refetch failed, caches left cold");
            return;
        }
        match self.fetch_detail(task_id) {
            Ok(task) => self.cache.put_detail(task),
            // The entity may legitimately be gone (e.g. raced delete).
            Err(e) => debug!(task = task_id, error = %e, "no detail after rollback"),
        }
    }

    fn require_todo(&mut self, task_id: &str, todo_id: &str) -> Result<(), TaskdeckError> {
        let task = self.task(task_id)?;
        if !task.todos.iter().any(|td| td.id == todo_id) {
            return Err(TaskdeckError::todo_not_found(todo_id));
        }
        Ok(())
    }

    fn current_task(&self, id: &str) -> Result<Task, TaskdeckError> {
        self.cache
            .get(id)
            .cloned()
            .ok_or_else(|| TaskdeckError::task_not_found(id))
    }

    fn current_todo(&self, task_id: &str, todo_id: &str) -> Result<TodoItem, TaskdeckError> {
        self.cache
            .get(task_id)
            .and_then(|t| t.todos.iter().find(|td| td.id == todo_id))
            .cloned()
            .ok_or_else(|| TaskdeckError::todo_not_found(todo_id))
    }
}

fn join_todos(tasks: Vec<Task>, todos: Vec<TodoItem>) -> Vec<Task> {
    tasks
        .into_iter()
        .map(|mut task| {
            task.todos = todos
                .iter()
                .filter(|t| t.task_id == task.id)
                .cloned()
                .collect();
            task
        })
        .collect()
}
