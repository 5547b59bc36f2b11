use super::TeamMember;
use crate::github::api::GitHubApi;
use crate::github::models::{Review, ReviewComment, ReviewState};
use crate::github::pulls::{PrActivity, GHOST_HANDLE};
use crate::github::{
    CommentDetail, DateFilter, GitHubError, PullRequest, PullRequestHandler, ReviewDetail,
    DEFAULT_RESULT_LIMIT,
};
use crate::observability::OperationTimer;
use crate::settings::GitHubSettings;
use crate::telemetry::{create_aggregation_span, generate_correlation_id};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Stages of one aggregation pass, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPhase {
    Init,
    FetchPrs,
    ScanActivity,
    Derive,
}

impl std::fmt::Display for AggregationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AggregationPhase::Init => "init",
            AggregationPhase::FetchPrs => "fetch_prs",
            AggregationPhase::ScanActivity => "scan_activity",
            AggregationPhase::Derive => "derive",
        };
        f.write_str(label)
    }
}

/// Builds per-member activity aggregates for the tracked team
pub struct TeamAggregator {
    pulls: PullRequestHandler,
    members: Vec<String>,
    result_limit: u32,
    max_concurrency: usize,
}

impl TeamAggregator {
    pub fn new(pulls: PullRequestHandler, members: Vec<String>) -> Self {
        Self {
            pulls,
            members,
            result_limit: DEFAULT_RESULT_LIMIT,
            max_concurrency: crate::github::DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Aggregator scoped and staffed from stored settings
    pub fn from_settings(
        api: Arc<dyn GitHubApi>,
        settings: &GitHubSettings,
    ) -> Result<Self, GitHubError> {
        let scope = settings.repo_scope()?;
        let members = settings.require_members()?.to_vec();
        Ok(Self::new(PullRequestHandler::new(api, scope), members))
    }

    pub fn with_result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit.max(1);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self.pulls = self.pulls.with_max_concurrency(max_concurrency);
        self
    }

    /// One aggregate per tracked handle, in configured order.
    ///
    /// A member whose PR search fails keeps an empty aggregate, and a PR
    /// whose reviews cannot be read is skipped. Only an empty team is an
    /// error.
    pub async fn fetch_team_data(&self, filter: DateFilter) -> Result<Vec<TeamMember>, GitHubError> {
        let correlation_id = generate_correlation_id();
        let span = create_aggregation_span("fetch_team_data", self.members.len(), &correlation_id);
        self.aggregate(filter).instrument(span).await
    }

    async fn aggregate(&self, filter: DateFilter) -> Result<Vec<TeamMember>, GitHubError> {
        let timer = OperationTimer::new("fetch_team_data");

        info!(phase = %AggregationPhase::Init, "Aggregating team activity");
        let mut team = self.init_members()?;
        let index: HashMap<String, usize> = team
            .iter()
            .enumerate()
            .map(|(i, member)| (member.handle.to_ascii_lowercase(), i))
            .collect();

        info!(phase = %AggregationPhase::FetchPrs, members = team.len(), "Fetching member PRs");
        let handles: Vec<String> = team.iter().map(|member| member.handle.clone()).collect();
        let fetched: Vec<Vec<PullRequest>> = stream::iter(handles)
            .map(|handle| async move {
                match self
                    .pulls
                    .fetch_pull_requests_for_user(&handle, filter, self.result_limit)
                    .await
                {
                    Ok(prs) => prs,
                    Err(e) => {
                        warn!(handle = %handle, error = %e, "Failed to fetch PRs, member left empty");
                        Vec::new()
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;
        for (member, prs) in team.iter_mut().zip(fetched) {
            member.prs = prs;
        }

        let mut seen = HashSet::new();
        let unique: Vec<PullRequest> = team
            .iter()
            .flat_map(|member| member.prs.iter())
            .filter(|pr| seen.insert(pr.key()))
            .cloned()
            .collect();

        info!(phase = %AggregationPhase::ScanActivity, prs = unique.len(), "Scanning reviews and comments");
        let scanned: Vec<(PullRequest, Result<PrActivity, GitHubError>)> = stream::iter(unique)
            .map(|pr| async move {
                let activity = self.pulls.fetch_pr_activity(&pr).await;
                (pr, activity)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        for (pr, activity) in scanned {
            match activity {
                Ok(activity) => attribute_activity(&mut team, &index, &pr, &activity),
                Err(e) => warn!(
                    repository = %pr.repository,
                    number = pr.number,
                    error = %e,
                    "Failed to read PR activity, skipping"
                ),
            }
        }

        info!(phase = %AggregationPhase::Derive, "Deriving review metrics");
        for member in &mut team {
            member.average_review_time_hours = average_review_time_hours(&member.review_details);
            member.last_approval_date = last_approval_date(&member.review_details);
        }

        timer.finish();
        Ok(team)
    }

    fn init_members(&self) -> Result<Vec<TeamMember>, GitHubError> {
        let mut seen = HashSet::new();
        let team: Vec<TeamMember> = self
            .members
            .iter()
            .map(|handle| handle.trim())
            .filter(|handle| !handle.is_empty())
            .filter(|handle| seen.insert(handle.to_ascii_lowercase()))
            .map(TeamMember::new)
            .collect();

        if team.is_empty() {
            return Err(GitHubError::missing("teamMembers"));
        }
        Ok(team)
    }
}

fn attribute_activity(
    team: &mut [TeamMember],
    index: &HashMap<String, usize>,
    pr: &PullRequest,
    activity: &PrActivity,
) {
    let pr_author = index.get(&pr.author.to_ascii_lowercase()).copied();

    for review in &activity.reviews {
        let author = review.author().unwrap_or(GHOST_HANDLE);
        if author.eq_ignore_ascii_case(&pr.author) {
            continue;
        }
        let reviewer = index.get(&author.to_ascii_lowercase()).copied();

        if let Some(i) = reviewer {
            if matches!(review.state, ReviewState::Approved | ReviewState::Dismissed) {
                team[i].approvals_given += 1;
                team[i].review_details.push(review_detail(pr, review));
            }
        }
        if review.is_comment() {
            let detail = review_comment_detail(pr, review, author);
            record_comment(team, reviewer, pr_author, detail);
        }
    }

    for comment in &activity.comments {
        let author = comment.author().unwrap_or(GHOST_HANDLE);
        if author.eq_ignore_ascii_case(&pr.author) {
            continue;
        }
        let commenter = index.get(&author.to_ascii_lowercase()).copied();
        let detail = line_comment_detail(pr, comment, author);
        record_comment(team, commenter, pr_author, detail);
    }
}

fn record_comment(
    team: &mut [TeamMember],
    commenter: Option<usize>,
    pr_author: Option<usize>,
    detail: CommentDetail,
) {
    if let Some(i) = commenter {
        team[i].comments_given += 1;
        team[i].comment_details.push(detail.clone());
    }
    if let Some(i) = pr_author {
        team[i].comments_received += 1;
        team[i].comments_from_others.push(detail);
    }
}

fn review_detail(pr: &PullRequest, review: &Review) -> ReviewDetail {
    ReviewDetail {
        id: review.id,
        pr_number: pr.number,
        pr_title: pr.title.clone(),
        repository: pr.repository.clone(),
        state: review.state.as_str().to_string(),
        submitted_at: review.submitted_at,
        pr_created_at: pr.created_at,
        url: pr.url.clone(),
    }
}

fn review_comment_detail(pr: &PullRequest, review: &Review, author: &str) -> CommentDetail {
    CommentDetail {
        id: review.id,
        pr_number: pr.number,
        pr_title: pr.title.clone(),
        repository: pr.repository.clone(),
        body: review.body.clone().unwrap_or_default(),
        created_at: review.submitted_at,
        url: pr.url.clone(),
        author: author.to_string(),
        pr_author: pr.author.clone(),
    }
}

fn line_comment_detail(pr: &PullRequest, comment: &ReviewComment, author: &str) -> CommentDetail {
    CommentDetail {
        id: comment.id,
        pr_number: pr.number,
        pr_title: pr.title.clone(),
        repository: pr.repository.clone(),
        body: comment.body.clone(),
        created_at: Some(comment.created_at),
        url: pr.url.clone(),
        author: author.to_string(),
        pr_author: pr.author.clone(),
    }
}

/// Rounded mean of the positive PR-open-to-review latencies
pub fn average_review_time_hours(details: &[ReviewDetail]) -> Option<f64> {
    let latencies: Vec<f64> = details
        .iter()
        .filter_map(ReviewDetail::latency_hours)
        .filter(|hours| *hours > 0.0)
        .collect();

    if latencies.is_empty() {
        return None;
    }
    let mean = latencies.iter().sum::<f64>() / latencies.len() as f64;
    debug!(samples = latencies.len(), mean, "Average review time computed");
    Some(mean.round())
}

pub fn last_approval_date(details: &[ReviewDetail]) -> Option<DateTime<Utc>> {
    details
        .iter()
        .filter(|detail| detail.state == ReviewState::Approved.as_str())
        .filter_map(|detail| detail.submitted_at)
        .max()
}
