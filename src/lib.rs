// team-pulse library: GitHub team activity and build dashboard core
// This exposes the components used by the CLI and by integration tests

pub mod cli;
pub mod config;
pub mod extract;
pub mod github;
pub mod http;
pub mod observability;
pub mod settings;
pub mod team;
pub mod telemetry;

// Re-export key types for easy access
pub use config::DashboardConfig;
pub use extract::{
    extract_from_archive, extract_pr_references, extract_release_info, ArtifactData,
    ExtractError, PrInfo, ReleaseInfo,
};
pub use github::{ActionsHandler, DateFilter, GitHubApi, GitHubError, PullRequestHandler};
pub use http::RateLimitedHttpClient;
pub use observability::{github_metrics, GitHubApiMetrics, OperationTimer};
pub use settings::{GitHubSettings, SettingsStore, WorkflowConfig, WorkflowSettings};
pub use team::{generate_leaderboard_data, LeaderboardEntry, TeamAggregator, TeamMember};
pub use telemetry::{generate_correlation_id, init_telemetry};
