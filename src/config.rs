use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, TaskdeckError};

/// Fallback backend URL, matching the backend's default dev port.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

const API_URL_ENV: &str = "TASKDECK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
}

/// Find the .git root by walking up from current directory.
pub fn find_git_root() -> Result<PathBuf, TaskdeckError> {
    let mut dir = env::current_dir().map_err(|e| TaskdeckError::config(e.to_string()))?;
    loop {
        if dir.join(".git").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TaskdeckError::new(
                ErrorCode::NotInitialized,
                "Not inside a git repository. taskdeck requires a git repository.",
            ));
        }
    }
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf, TaskdeckError> {
    let root = find_git_root()?;
    Ok(root.join(".taskdeck").join("config.json"))
}

/// Load the config file. Returns error if not initialized.
pub fn load_config() -> Result<Config, TaskdeckError> {
    let path = config_path()?;
    if !path.exists() {
        return Err(TaskdeckError::not_initialized());
    }
    let raw = fs::read_to_string(&path).map_err(|e| TaskdeckError::config(e.to_string()))?;
    serde_json::from_str(&raw)
        .map_err(|e| TaskdeckError::config(format!("Invalid config file: {e}")))
}

/// Resolve the backend URL: `--api-url` flag, then the environment,
/// then the config file written by `taskdeck init`.
pub fn resolve_api_url(flag: Option<&str>) -> Result<String, TaskdeckError> {
    if let Some(url) = flag {
        return Ok(normalize(url));
    }
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.is_empty() {
            return Ok(normalize(&url));
        }
    }
    let config = load_config()?;
    Ok(normalize(&config.api_url))
}

/// Initialize taskdeck: create the state directory and write the config.
pub fn init_config(api_url: Option<&str>) -> Result<PathBuf, TaskdeckError> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TaskdeckError::config(e.to_string()))?;
    }
    let config = Config {
        api_url: normalize(api_url.unwrap_or(DEFAULT_API_URL)),
    };
    let raw = serde_json::to_string_pretty(&config)
        .map_err(|e| TaskdeckError::config(e.to_string()))?;
    fs::write(&path, raw).map_err(|e| TaskdeckError::config(e.to_string()))?;
    Ok(path)
}

fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
