use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::TaskdeckError;

/// Thin wrapper over the blocking HTTP client, rooted at the backend URL.
/// Every call is a single attempt; retry policy belongs to the caller.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TaskdeckError> {
        let url = self.url(path);
        debug!(method = "GET", %url, "api request");
        let response = self.http.get(&url).send()?;
        parse_json(response)
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TaskdeckError> {
        let url = self.url(path);
        debug!(method = "POST", %url, "api request");
        let response = self.http.post(&url).json(body).send()?;
        parse_json(response)
    }

    pub fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TaskdeckError> {
        let url = self.url(path);
        debug!(method = "PATCH", %url, "api request");
        let response = self.http.patch(&url).json(body).send()?;
        parse_json(response)
    }

    pub fn delete(&self, path: &str) -> Result<(), TaskdeckError> {
        let url = self.url(path);
        debug!(method = "DELETE", %url, "api request");
        let response = self.http.delete(&url).send()?;
        check_status(&response)?;
        Ok(())
    }
}

/// Non-2xx responses fail uniformly; no structured error body is parsed.
fn check_status(response: &Response) -> Result<(), TaskdeckError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TaskdeckError::api(
            status.as_u16(),
            format!(
                "API error: {}",
                status.canonical_reason().unwrap_or("unknown status")
            ),
        ));
    }
    Ok(())
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, TaskdeckError> {
    check_status(&response)?;
    response.json().map_err(TaskdeckError::from)
}
