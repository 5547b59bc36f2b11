//! Persisted dashboard settings.
//!
//! Two independent JSON records are kept: the GitHub connection
//! (`github_settings`) and the tracked workflows (`workflow_settings`).
//! Fetchers never read storage themselves; commands load the records
//! through [`SettingsStore`] and pass them in.

pub mod obfuscation;
pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SettingsStorage};
pub use store::SettingsStore;

use crate::github::GitHubError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GITHUB_SETTINGS_KEY: &str = "github_settings";
pub const WORKFLOW_SETTINGS_KEY: &str = "workflow_settings";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Repository value meaning "every repository in the organization"
pub const ALL_REPOSITORIES: &str = "*";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connection settings for the GitHub API
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubSettings {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default, rename = "teamMembers", alias = "trackedMembers")]
    pub tracked_members: Vec<String>,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("repository", &self.repository)
            .field("tracked_members", &self.tracked_members)
            .finish()
    }
}

impl GitHubSettings {
    pub fn require_token(&self) -> Result<&str, GitHubError> {
        non_empty(&self.token).ok_or_else(|| GitHubError::missing("token"))
    }

    pub fn repo_scope(&self) -> Result<RepoScope, GitHubError> {
        let organization =
            non_empty(&self.organization).ok_or_else(|| GitHubError::missing("organization"))?;
        let repository =
            non_empty(&self.repository).ok_or_else(|| GitHubError::missing("repository"))?;

        if repository == ALL_REPOSITORIES {
            Ok(RepoScope::Organization(organization.to_string()))
        } else {
            Ok(RepoScope::Repository {
                owner: organization.to_string(),
                name: repository.to_string(),
            })
        }
    }

    pub fn require_members(&self) -> Result<&[String], GitHubError> {
        if self.tracked_members.iter().all(|member| member.trim().is_empty()) {
            return Err(GitHubError::missing("teamMembers"));
        }
        Ok(&self.tracked_members)
    }

    /// Stored base URL, or `fallback` when none was saved
    pub fn base_url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(&self.base_url).unwrap_or(fallback)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Where searches and Actions queries are pointed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoScope {
    Repository { owner: String, name: String },
    Organization(String),
}

impl RepoScope {
    /// Search qualifier: `repo:owner/name` or `org:owner`
    pub fn search_qualifier(&self) -> String {
        match self {
            RepoScope::Repository { owner, name } => format!("repo:{owner}/{name}"),
            RepoScope::Organization(org) => format!("org:{org}"),
        }
    }

    /// `owner/repo` path used by the Actions endpoints.
    ///
    /// Actions has no organization-wide listing, so the wildcard scope falls
    /// back to the organization's same-named repository.
    pub fn actions_path(&self) -> String {
        match self {
            RepoScope::Repository { owner, name } => format!("{owner}/{name}"),
            RepoScope::Organization(org) => format!("{org}/{org}"),
        }
    }
}

/// A tracked workflow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl WorkflowConfig {
    /// Shape given to workflows stored as a bare identifier
    pub fn from_legacy_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: format!("Workflow {id}"),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    #[serde(default)]
    pub workflow_ids: Vec<WorkflowConfig>,
}
