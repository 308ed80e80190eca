use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskdeck",
    version = VERSION,
    about = "Task and todo tracker backed by a REST API",
    after_help = "\
NOTE:
  Requires a git repository. Config is stored at <git-root>/.taskdeck/config.json
  Run `taskdeck init` before any other command, or set TASKDECK_API_URL.

EXIT CODES:
  0  Success
  1  Error (API, network, validation, not found)

DERIVED STATUS:
  A task with at least one todo gets its status from its todos after every
  todo change: all complete -> Done, any started -> Doing, else Todo.
  Manual status changes stick only on tasks with no todos."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL (overrides config and TASKDECK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize taskdeck in this repository (use --api-url to set the backend)
    Init,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Todo management, scoped to a task
    #[command(subcommand)]
    Todo(TodoCommands),

    /// Show the overall board status
    Status,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Initial status: Todo, Doing or Done
        #[arg(long, default_value = "Todo")]
        status: String,
        #[arg(long, default_value = "")]
        assignee: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Priority: Low, Medium or High
        #[arg(long, default_value = "Medium")]
        priority: String,
    },
    /// List tasks
    List {
        /// Only tasks with this status
        #[arg(long)]
        status: Option<String>,
        /// Only tasks with this priority
        #[arg(long)]
        priority: Option<String>,
        /// Only tasks assigned to this person
        #[arg(long)]
        assignee: Option<String>,
        /// Sort order: created, due, priority or title
        #[arg(long, default_value = "created")]
        sort: String,
    },
    /// Show task details with todos and progress
    Show {
        /// Task ID
        id: String,
    },
    /// Update task fields
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Set task status directly (overridden by todos on the next todo change)
    Status {
        id: String,
        /// Todo, Doing or Done
        status: String,
    },
    /// Delete a task and its todos
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a todo to a task (starts Pending)
    Add {
        /// Owning task ID
        task_id: String,
        /// Todo title
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List a task's todos
    List {
        task_id: String,
    },
    /// Update todo fields
    Update {
        task_id: String,
        todo_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Set todo status: Pending, Todo, "In Progress" or Complete
    Status {
        task_id: String,
        todo_id: String,
        status: String,
    },
    /// Delete a todo
    Delete {
        task_id: String,
        todo_id: String,
    },
}
