use super::errors::GitHubError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Read-only access to a GitHub-compatible REST API.
///
/// Routes are either paths relative to the configured base URL
/// (`/repos/o/r/pulls/1`) or absolute URLs handed back by the API itself
/// (`jobs_url`, `archive_download_url`). Implementations turn non-2xx
/// answers into [`GitHubError::Http`].
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn get_json(&self, route: &str) -> Result<serde_json::Value, GitHubError>;

    /// Plain-text body, used for job logs
    async fn get_text(&self, route: &str) -> Result<String, GitHubError>;

    /// Binary body, used for artifact archives
    async fn get_bytes(&self, route: &str) -> Result<Vec<u8>, GitHubError>;
}

/// Fetch a JSON route and decode it into `T`
pub async fn get_typed<T: DeserializeOwned>(
    api: &dyn GitHubApi,
    route: &str,
) -> Result<T, GitHubError> {
    let value = api.get_json(route).await?;
    serde_json::from_value(value).map_err(|source| GitHubError::Decode {
        route: route.to_string(),
        source,
    })
}
