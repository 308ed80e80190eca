use std::cell::RefCell;
use std::rc::Rc;

use taskdeck::api::Backend;
use taskdeck::error::{ErrorCode, TaskdeckError};
use taskdeck::models::{
    Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus, TodoDraft, TodoItem, TodoPatch,
    TodoStatus,
};
use taskdeck::progress;
use taskdeck::store::TaskStore;

// ─── in-memory backend ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    CreateTask,
    UpdateTask,
    DeleteTask,
    CreateTodo,
    UpdateTodo,
    DeleteTodo,
}

#[derive(Debug, Default, Clone)]
struct Counters {
    fetch_tasks: usize,
    update_task: usize,
    create_todo: usize,
}

#[derive(Default)]
struct State {
    tasks: Vec<Task>,
    todos: Vec<TodoItem>,
    seq: usize,
    fail_next: Option<Op>,
    counters: Counters,
}

/// Backend double holding server state in memory, with single-shot
/// failure injection for the rollback tests.
#[derive(Clone, Default)]
struct MemoryBackend {
    state: Rc<RefCell<State>>,
}

fn timestamp(seq: usize) -> String {
    format!("2026-08-07T00:00:00.{seq:03}Z")
}

impl MemoryBackend {
    fn new() -> Self {
        Self::default()
    }

    fn seed_task(&self, title: &str, status: TaskStatus, priority: TaskPriority) -> String {
        let mut s = self.state.borrow_mut();
        s.seq += 1;
        let id = format!("task-{}", s.seq);
        let created_at = timestamp(s.seq);
        s.tasks.push(Task {
            id: id.clone(),
            title: title.into(),
            description: String::new(),
            status,
            assignee: String::new(),
            due_date: None,
            priority,
            todos: Vec::new(),
            created_at,
        });
        id
    }

    fn seed_todo(&self, task_id: &str, title: &str, status: TodoStatus) -> String {
        let mut s = self.state.borrow_mut();
        s.seq += 1;
        let id = format!("todo-{}", s.seq);
        let created_at = timestamp(s.seq);
        s.todos.push(TodoItem {
            id: id.clone(),
            task_id: task_id.into(),
            title: title.into(),
            description: None,
            status,
            created_at,
        });
        id
    }

    fn fail_next(&self, op: Op) {
        self.state.borrow_mut().fail_next = Some(op);
    }

    fn counters(&self) -> Counters {
        self.state.borrow().counters.clone()
    }

    fn server_task(&self, id: &str) -> Option<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    fn server_task_status(&self, id: &str) -> TaskStatus {
        self.server_task(id).expect("task on server").status
    }

    fn server_todos(&self, task_id: &str) -> Vec<TodoItem> {
        self.state
            .borrow()
            .todos
            .iter()
            .filter(|t| t.task_id == task_id)
            .cloned()
            .collect()
    }

    fn maybe_fail(&self, op: Op) -> Result<(), TaskdeckError> {
        let mut s = self.state.borrow_mut();
        if s.fail_next == Some(op) {
            s.fail_next = None;
            return Err(TaskdeckError::api(500, "injected backend failure"));
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn fetch_tasks(&self) -> Result<Vec<Task>, TaskdeckError> {
        self.state.borrow_mut().counters.fetch_tasks += 1;
        Ok(self.state.borrow().tasks.clone())
    }

    fn fetch_task(&self, id: &str) -> Result<Task, TaskdeckError> {
        self.server_task(id)
            .ok_or_else(|| TaskdeckError::task_not_found(id))
    }

    fn fetch_todos(&self) -> Result<Vec<TodoItem>, TaskdeckError> {
        Ok(self.state.borrow().todos.clone())
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskdeckError> {
        self.maybe_fail(Op::CreateTask)?;
        let mut s = self.state.borrow_mut();
        s.seq += 1;
        let task = Task {
            id: format!("task-{}", s.seq),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            assignee: draft.assignee.clone(),
            due_date: draft.due_date.clone(),
            priority: draft.priority,
            todos: Vec::new(),
            created_at: timestamp(s.seq),
        };
        s.tasks.push(task.clone());
        Ok(task)
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, TaskdeckError> {
        self.maybe_fail(Op::UpdateTask)?;
        let mut s = self.state.borrow_mut();
        s.counters.update_task += 1;
        let task = s
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskdeckError::task_not_found(id))?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    fn delete_task(&self, id: &str) -> Result<(), TaskdeckError> {
        self.maybe_fail(Op::DeleteTask)?;
        let mut s = self.state.borrow_mut();
        let before = s.tasks.len();
        s.tasks.retain(|t| t.id != id);
        if s.tasks.len() == before {
            return Err(TaskdeckError::task_not_found(id));
        }
        Ok(())
    }

    fn create_todo(&self, draft: &TodoDraft) -> Result<TodoItem, TaskdeckError> {
        self.maybe_fail(Op::CreateTodo)?;
        let mut s = self.state.borrow_mut();
        s.counters.create_todo += 1;
        s.seq += 1;
        let todo = TodoItem {
            id: format!("todo-{}", s.seq),
            task_id: draft.task_id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: TodoStatus::Pending,
            created_at: timestamp(s.seq),
        };
        s.todos.push(todo.clone());
        Ok(todo)
    }

    fn update_todo(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem, TaskdeckError> {
        self.maybe_fail(Op::UpdateTodo)?;
        let mut s = self.state.borrow_mut();
        let todo = s
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskdeckError::todo_not_found(id))?;
        patch.apply_to(todo);
        Ok(todo.clone())
    }

    fn delete_todo(&self, id: &str) -> Result<(), TaskdeckError> {
        self.maybe_fail(Op::DeleteTodo)?;
        let mut s = self.state.borrow_mut();
        let before = s.todos.len();
        s.todos.retain(|t| t.id != id);
        if s.todos.len() == before {
            return Err(TaskdeckError::todo_not_found(id));
        }
        Ok(())
    }
}

fn store_with_backend() -> (TaskStore<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::new();
    (TaskStore::new(backend.clone()), backend)
}

// ─── reads ─────────────────────────────────────────────────────────

#[test]
fn test_list_joins_todos_onto_tasks() {
    let (mut store, backend) = store_with_backend();
    let t1 = backend.seed_task("one", TaskStatus::Todo, TaskPriority::Medium);
    let t2 = backend.seed_task("two", TaskStatus::Todo, TaskPriority::Low);
    backend.seed_todo(&t1, "a", TodoStatus::Pending);
    backend.seed_todo(&t2, "b", TodoStatus::Complete);
    backend.seed_todo(&t1, "c", TodoStatus::Todo);

    let tasks = store.tasks().unwrap();
    let first = tasks.iter().find(|t| t.id == t1).unwrap();
    let second = tasks.iter().find(|t| t.id == t2).unwrap();
    assert_eq!(first.todos.len(), 2);
    assert_eq!(first.todos[0].title, "a");
    assert_eq!(first.todos[1].title, "c");
    assert_eq!(second.todos.len(), 1);
}

#[test]
fn test_reads_are_served_from_cache() {
    let (mut store, backend) = store_with_backend();
    backend.seed_task("one", TaskStatus::Todo, TaskPriority::Medium);

    store.tasks().unwrap();
    store.tasks().unwrap();
    store.tasks().unwrap();

    assert_eq!(backend.counters().fetch_tasks, 1);
}

#[test]
fn test_task_not_found() {
    let (mut store, _backend) = store_with_backend();
    let err = store.task("missing").unwrap_err();
    assert_eq!(err.code, ErrorCode::TaskNotFound);
}

// ─── create ────────────────────────────────────────────────────────

#[test]
fn test_create_task_refetches_list() {
    let (mut store, backend) = store_with_backend();
    store.tasks().unwrap();

    let created = store
        .create_task(&TaskDraft {
            title: "Ship release".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            assignee: String::new(),
            due_date: None,
            priority: TaskPriority::High,
        })
        .unwrap();

    let tasks = store.tasks().unwrap();
    assert!(tasks.iter().any(|t| t.id == created.id));
    // one initial fetch plus the refetch after create
    assert_eq!(backend.counters().fetch_tasks, 2);
}

#[test]
fn test_create_task_validation_never_reaches_backend() {
    let (mut store, backend) = store_with_backend();
    let err = store
        .create_task(&TaskDraft {
            title: "   ".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            assignee: String::new(),
            due_date: None,
            priority: TaskPriority::Medium,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(backend.server_task("task-1").is_none());
}

#[test]
fn test_add_todo_validation_never_reaches_backend() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("one", TaskStatus::Todo, TaskPriority::Medium);

    let err = store
        .add_todo(&TodoDraft {
            task_id,
            title: "".into(),
            description: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(backend.counters().create_todo, 0);
}

// ─── optimistic updates ────────────────────────────────────────────

#[test]
fn test_update_success_keeps_optimistic_state_without_refetch() {
    let (mut store, backend) = store_with_backend();
    let id = backend.seed_task("old title", TaskStatus::Todo, TaskPriority::Medium);
    store.tasks().unwrap();
    store.task(&id).unwrap();

    let patch = TaskPatch {
        title: Some("new title".into()),
        ..TaskPatch::default()
    };
    let updated = store.update_task(&id, &patch).unwrap();

    assert_eq!(updated.title, "new title");
    assert_eq!(store.cache().task_detail(&id).unwrap().title, "new title");
    assert_eq!(store.cache().task_list().unwrap()[0].title, "new title");
    assert_eq!(backend.server_task(&id).unwrap().title, "new title");
    // the optimistic state was kept; no refetch beyond the initial read
    assert_eq!(backend.counters().fetch_tasks, 1);
}

#[test]
fn test_failed_task_update_rolls_back_to_server_state() {
    let (mut store, backend) = store_with_backend();
    let id = backend.seed_task("stable", TaskStatus::Doing, TaskPriority::Medium);
    store.tasks().unwrap();
    store.task(&id).unwrap();
    let before = backend.server_task(&id).unwrap();

    backend.fail_next(Op::UpdateTask);
    let err = store
        .update_task(
            &id,
            &TaskPatch {
                title: Some("rejected".into()),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ApiError);

    // both cache entries equal the pre-mutation server state
    let cached = store.cache().task_detail(&id).unwrap();
    assert_eq!(cached.title, before.title);
    assert_eq!(cached.status, before.status);
    let listed = &store.cache().task_list().unwrap()[0];
    assert_eq!(listed.title, before.title);
    assert_eq!(backend.server_task(&id).unwrap().title, "stable");
}

#[test]
fn test_failed_todo_update_rolls_back_and_skips_reconcile() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("one", TaskStatus::Todo, TaskPriority::Medium);
    let todo_id = backend.seed_todo(&task_id, "a", TodoStatus::Pending);
    store.tasks().unwrap();

    backend.fail_next(Op::UpdateTodo);
    let err = store
        .move_todo(&task_id, &todo_id, TodoStatus::Complete)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ApiError);

    // the rejected optimistic value is gone from every cache copy
    let cached = store.cache().get(&task_id).unwrap();
    assert_eq!(cached.todos[0].status, TodoStatus::Pending);
    // and no derived task-status mutation was issued
    assert_eq!(backend.counters().update_task, 0);
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Todo);
}

#[test]
fn test_failed_todo_delete_restores_todo() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("one", TaskStatus::Todo, TaskPriority::Medium);
    let todo_id = backend.seed_todo(&task_id, "keep me", TodoStatus::Pending);
    store.task(&task_id).unwrap();

    backend.fail_next(Op::DeleteTodo);
    store.delete_todo(&task_id, &todo_id).unwrap_err();

    let cached = store.cache().get(&task_id).unwrap();
    assert_eq!(cached.todos.len(), 1);
    assert_eq!(cached.todos[0].title, "keep me");
}

// ─── delete ────────────────────────────────────────────────────────

#[test]
fn test_delete_task_removes_task_and_todos() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("gone", TaskStatus::Todo, TaskPriority::Medium);
    backend.seed_todo(&task_id, "a", TodoStatus::Pending);
    backend.seed_todo(&task_id, "b", TodoStatus::Complete);
    store.tasks().unwrap();

    store.delete_task(&task_id).unwrap();

    assert!(backend.server_task(&task_id).is_none());
    assert!(backend.server_todos(&task_id).is_empty());
    assert!(store.cache().get(&task_id).is_none());
}

#[test]
fn test_failed_delete_restores_cache_from_server() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("sticky", TaskStatus::Todo, TaskPriority::Medium);
    store.tasks().unwrap();

    backend.fail_next(Op::DeleteTask);
    store.delete_task(&task_id).unwrap_err();

    assert!(backend.server_task(&task_id).is_some());
    assert!(store.cache().get(&task_id).is_some());
}

// ─── derived status ────────────────────────────────────────────────

#[test]
fn test_scenario_complete_only_todo_drives_task_done() {
    // create a task with no todos, add one, complete it
    let (mut store, backend) = store_with_backend();
    let created = store
        .create_task(&TaskDraft {
            title: "Ship release".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            assignee: String::new(),
            due_date: None,
            priority: TaskPriority::High,
        })
        .unwrap();
    assert_eq!(
        progress::suggest_status(store.task(&created.id).unwrap()),
        TaskStatus::Todo
    );

    let (todo, changed) = store
        .add_todo(&TodoDraft {
            task_id: created.id.clone(),
            title: "cut the tag".into(),
            description: None,
        })
        .unwrap();
    // a single Pending todo still suggests Todo, so nothing changes
    assert_eq!(changed, None);
    assert_eq!(backend.server_task_status(&created.id), TaskStatus::Todo);

    let (_, changed) = store
        .move_todo(&created.id, &todo.id, TodoStatus::Complete)
        .unwrap();
    assert_eq!(changed, Some(TaskStatus::Done));
    assert_eq!(backend.server_task_status(&created.id), TaskStatus::Done);
    assert_eq!(
        store.cache().task_detail(&created.id).unwrap().status,
        TaskStatus::Done
    );
    assert_eq!(backend.counters().update_task, 1);
}

#[test]
fn test_scenario_first_started_todo_drives_task_doing() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("two todos", TaskStatus::Todo, TaskPriority::Medium);
    let todo_id = backend.seed_todo(&task_id, "a", TodoStatus::Pending);
    backend.seed_todo(&task_id, "b", TodoStatus::Pending);
    store.tasks().unwrap();

    let (_, changed) = store
        .move_todo(&task_id, &todo_id, TodoStatus::InProgress)
        .unwrap();

    assert_eq!(changed, Some(TaskStatus::Doing));
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Doing);
}

#[test]
fn test_scenario_deleting_last_todo_keeps_manual_status() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("done task", TaskStatus::Done, TaskPriority::Medium);
    let todo_id = backend.seed_todo(&task_id, "only", TodoStatus::Complete);
    store.tasks().unwrap();

    let changed = store.delete_todo(&task_id, &todo_id).unwrap();

    // no todos left: the stored status stands, no mutation is issued
    assert_eq!(changed, None);
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Done);
    assert_eq!(backend.counters().update_task, 0);
}

#[test]
fn test_adding_todo_to_done_task_pulls_it_back_to_doing() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("done task", TaskStatus::Done, TaskPriority::Medium);
    backend.seed_todo(&task_id, "finished", TodoStatus::Complete);
    store.tasks().unwrap();

    let (_, changed) = store
        .add_todo(&TodoDraft {
            task_id: task_id.clone(),
            title: "one more thing".into(),
            description: None,
        })
        .unwrap();

    // one complete + one pending todo suggests Doing
    assert_eq!(changed, Some(TaskStatus::Doing));
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Doing);
}

#[test]
fn test_manual_status_on_task_with_todos_is_overridden_on_next_todo_change() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("task", TaskStatus::Todo, TaskPriority::Medium);
    backend.seed_todo(&task_id, "a", TodoStatus::Pending);
    let todo_b = backend.seed_todo(&task_id, "b", TodoStatus::Pending);
    store.tasks().unwrap();

    // manual override sticks until a todo changes
    store.set_task_status(&task_id, TaskStatus::Done).unwrap();
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Done);

    let (_, changed) = store
        .move_todo(&task_id, &todo_b, TodoStatus::InProgress)
        .unwrap();
    assert_eq!(changed, Some(TaskStatus::Doing));
    assert_eq!(backend.server_task_status(&task_id), TaskStatus::Doing);
}

#[test]
fn test_update_todo_returns_patched_todo() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("task", TaskStatus::Todo, TaskPriority::Medium);
    let todo_id = backend.seed_todo(&task_id, "old", TodoStatus::Pending);
    store.tasks().unwrap();

    let (todo, _) = store
        .update_todo(
            &task_id,
            &todo_id,
            &TodoPatch {
                title: Some("new".into()),
                ..TodoPatch::default()
            },
        )
        .unwrap();

    assert_eq!(todo.title, "new");
    assert_eq!(todo.status, TodoStatus::Pending);
}

#[test]
fn test_unknown_todo_is_rejected_before_any_mutation() {
    let (mut store, backend) = store_with_backend();
    let task_id = backend.seed_task("task", TaskStatus::Todo, TaskPriority::Medium);
    store.tasks().unwrap();

    let err = store
        .move_todo(&task_id, "missing", TodoStatus::Complete)
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::TodoNotFound);
    assert_eq!(backend.counters().update_task, 0);
}
