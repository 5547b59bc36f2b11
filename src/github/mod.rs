pub mod actions;
pub mod api;
pub mod errors;
pub mod models;
pub mod pulls;
pub mod types;

pub use actions::{ActionsHandler, DEFAULT_JOB_FILTER};
pub use api::GitHubApi;
pub use errors::GitHubError;
pub use pulls::{PrActivity, PullRequestHandler, DEFAULT_MAX_CONCURRENCY, DEFAULT_RESULT_LIMIT};
pub use types::{
    Artifact, CommentDetail, DateFilter, FetchParams, JobRun, JobStep, PrStatus, PullRequest,
    ReviewDetail, WorkflowRun,
};
