//! Response shapes of the GitHub REST endpoints this crate reads.
//!
//! Only the fields the dashboard uses are declared. Anything GitHub may send
//! as `null` (deleted users, runs without a head commit) is an `Option`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pull_request: Option<PullRequestLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLink {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullDetail {
    pub state: String,
    #[serde(default)]
    pub merged: Option<bool>,
    pub merged_at: Option<DateTime<Utc>>,
    pub base: PullBase,
}

impl PullDetail {
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(false) || self.merged_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullBase {
    pub repo: RepositoryRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub full_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Approved => "APPROVED",
            ReviewState::ChangesRequested => "CHANGES_REQUESTED",
            ReviewState::Commented => "COMMENTED",
            ReviewState::Dismissed => "DISMISSED",
            ReviewState::Pending => "PENDING",
            ReviewState::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user: Option<User>,
    pub state: ReviewState,
    pub body: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }

    /// A COMMENTED review with text counts as a comment
    pub fn is_comment(&self) -> bool {
        self.state == ReviewState::Commented
            && self.body.as_deref().is_some_and(|body| !body.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub user: Option<User>,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewComment {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunsResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflow_runs: Vec<RawWorkflowRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowRun {
    pub id: u64,
    pub name: Option<String>,
    pub workflow_id: u64,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub run_number: u64,
    pub run_attempt: Option<u64>,
    pub display_title: Option<String>,
    #[serde(default)]
    pub event: String,
    pub repository: Option<RepositoryRef>,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
    pub head_commit: Option<HeadCommit>,
    pub actor: Option<User>,
    pub jobs_url: String,
    pub artifacts_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<RawJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Option<Vec<RawStep>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStep {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsResponse {
    #[serde(default)]
    pub artifacts: Vec<RawArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtifact {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    pub archive_download_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
