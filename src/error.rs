use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    ConfigError,
    ApiError,
    NetworkError,
    TaskNotFound,
    TodoNotFound,
    ValidationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ApiError => "API_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::TodoNotFound => "TODO_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskdeckError {
    pub code: ErrorCode,
    pub message: String,
    /// HTTP status of the failed response, set for ApiError only.
    pub http_status: Option<u16>,
}

impl TaskdeckError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "taskdeck is not initialized. Run `taskdeck init` first.",
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ApiError,
            message: message.into(),
            http_status: Some(status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn todo_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TodoNotFound,
            format!("Todo not found: {reference}"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

impl From<reqwest::Error> for TaskdeckError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::api(status.as_u16(), format!("API error: {e}")),
            None => Self::network(format!("Request failed: {e}")),
        }
    }
}
