pub mod commands;
pub mod init;
pub mod status;
pub mod task;
pub mod todo;

pub use commands::*;

use crate::api::ApiClient;
use crate::config;
use crate::error::TaskdeckError;
use crate::store::TaskStore;

/// Open a store against the configured backend. Returns error if not
/// initialized and no URL override is available.
pub fn open_store(api_url: Option<&str>) -> Result<TaskStore<ApiClient>, TaskdeckError> {
    let url = config::resolve_api_url(api_url)?;
    Ok(TaskStore::new(ApiClient::new(url)))
}
