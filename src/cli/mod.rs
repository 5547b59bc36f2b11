use crate::github::DateFilter;
use crate::team::LeaderboardMetric;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "team-pulse")]
#[command(version)]
#[command(about = "Team activity and build dashboard for GitHub")]
#[command(long_about = "team-pulse reads pull requests, reviews and GitHub Actions runs for a tracked team \
                       and turns them into activity aggregates, a leaderboard and release listings. \
                       Get started with 'team-pulse settings set' and 'team-pulse settings members add'.")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-member activity: PRs, comments, approvals, review time
    Team {
        /// Recency window: all, week, two-weeks
        #[arg(long, default_value = "all")]
        since: DateFilter,
        /// Print the aggregates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ranked summary of team activity
    Leaderboard {
        #[arg(long, default_value = "all")]
        since: DateFilter,
        /// Ranking metric: prs, comments, approvals, received, review-time
        #[arg(long, default_value = "approvals")]
        sort: LeaderboardMetric,
        #[arg(long)]
        json: bool,
    },
    /// Workflow runs of the tracked workflows, newest first
    Builds {
        /// Case-insensitive filter over run fields and PR numbers
        #[arg(long, default_value = "")]
        search: String,
        /// Only this workflow id
        #[arg(long)]
        workflow: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Jobs of a run with release records parsed from their logs
    Jobs {
        run_id: u64,
        /// Only jobs whose name contains this text
        #[arg(long, default_value = crate::github::DEFAULT_JOB_FILTER)]
        filter: String,
        /// Include raw logs in the output
        #[arg(long)]
        logs: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the raw log of one job
    Logs { job_id: u64 },
    /// Run the text extractors on local files
    Extract {
        #[command(subcommand)]
        command: ExtractCommand,
    },
    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Write a default team-pulse.toml
    InitConfig {
        #[arg(long, default_value = "team-pulse.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ExtractCommand {
    /// Release records from a job log (`-` reads stdin)
    Releases {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// PR references from a release-notes file (`-` reads stdin)
    Notes {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// PR references from a zipped artifact
    Archive {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print stored settings (token redacted)
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Update connection settings; omitted fields are kept
    Set {
        #[arg(long)]
        token: Option<String>,
        /// API root, e.g. https://ghe.example.com/api/v3
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        organization: Option<String>,
        /// Repository name, or * for the whole organization
        #[arg(long)]
        repository: Option<String>,
    },
    /// Manage tracked team members
    Members {
        #[command(subcommand)]
        command: MembersCommand,
    },
    /// Manage tracked workflows
    Workflows {
        #[command(subcommand)]
        command: WorkflowsCommand,
    },
}

#[derive(Subcommand)]
pub enum MembersCommand {
    List,
    Add { handle: String },
    Remove { handle: String },
}

#[derive(Subcommand)]
pub enum WorkflowsCommand {
    List,
    Add {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value_t = crate::settings::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    Remove { id: String },
}
