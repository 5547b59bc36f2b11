use super::api::{get_typed, GitHubApi};
use super::errors::GitHubError;
use super::models::{PullDetail, Review, ReviewComment, ReviewState, SearchItem, SearchResponse};
use super::types::{DateFilter, PrStatus, PullRequest};
use crate::settings::RepoScope;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_RESULT_LIMIT: u32 = 10;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Login shown for users GitHub no longer knows about
pub const GHOST_HANDLE: &str = "ghost";

/// Reviews and line comments of a single pull request
#[derive(Debug, Clone, Default)]
pub struct PrActivity {
    pub reviews: Vec<Review>,
    pub comments: Vec<ReviewComment>,
}

/// Handler for pull request search and enrichment
#[derive(Clone)]
pub struct PullRequestHandler {
    api: Arc<dyn GitHubApi>,
    scope: RepoScope,
    max_concurrency: usize,
}

impl PullRequestHandler {
    pub fn new(api: Arc<dyn GitHubApi>, scope: RepoScope) -> Self {
        Self {
            api,
            scope,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn scope(&self) -> &RepoScope {
        &self.scope
    }

    /// Search route for a member's PRs, newest update first
    pub fn search_route(
        &self,
        handle: &str,
        filter: DateFilter,
        limit: u32,
        now: DateTime<Utc>,
    ) -> String {
        let query = format!(
            "{} author:{} is:pr{}",
            self.scope.search_qualifier(),
            handle,
            filter.search_qualifier(now)
        );
        format!(
            "/search/issues?q={}&sort=updated&order=desc&per_page={}",
            urlencoding::encode(&query),
            limit
        )
    }

    /// PRs authored by `handle`, each with status and review counts.
    ///
    /// Hits updated before the filter window are dropped even if the search
    /// index returned them. Any failed request fails the whole call.
    pub async fn fetch_pull_requests_for_user(
        &self,
        handle: &str,
        filter: DateFilter,
        limit: u32,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let now = Utc::now();
        let route = self.search_route(handle, filter, limit, now);
        let search: SearchResponse = get_typed(self.api.as_ref(), &route).await?;
        debug!(
            handle = %handle,
            total = search.total_count,
            returned = search.items.len(),
            "PR search finished"
        );

        let pulls: Vec<PullRequest> = stream::iter(search.items)
            .filter(|item| {
                futures::future::ready(
                    item.pull_request.is_some() && filter.is_in_range(item.updated_at, now),
                )
            })
            .map(|item| self.enrich(item))
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        info!(handle = %handle, count = pulls.len(), "Fetched pull requests");
        Ok(pulls)
    }

    async fn enrich(&self, item: SearchItem) -> Result<PullRequest, GitHubError> {
        let Some(link) = item.pull_request.as_ref() else {
            return Err(GitHubError::Uri(item.html_url.clone()));
        };
        let detail: PullDetail = get_typed(self.api.as_ref(), &link.url).await?;
        let repository = detail.base.repo.full_name.clone();
        let activity = self.fetch_activity(&repository, item.number).await?;

        let status = if detail.is_merged() {
            PrStatus::Merged
        } else if detail.state == "closed" {
            PrStatus::Closed
        } else {
            PrStatus::Open
        };

        let mut approver_handles = Vec::new();
        let mut dismisser_handles = Vec::new();
        for review in &activity.reviews {
            let author = review.author().unwrap_or(GHOST_HANDLE).to_string();
            match review.state {
                ReviewState::Approved => approver_handles.push(author),
                ReviewState::Dismissed => dismisser_handles.push(author),
                _ => {}
            }
        }
        let comment_count = activity.comments.len()
            + activity.reviews.iter().filter(|review| review.is_comment()).count();

        Ok(PullRequest {
            id: item.id,
            number: item.number,
            title: item.title,
            url: item.html_url,
            author: item
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| GHOST_HANDLE.to_string()),
            status,
            created_at: item.created_at,
            updated_at: item.updated_at,
            repository,
            comment_count,
            approval_count: approver_handles.len(),
            dismissed_count: dismisser_handles.len(),
            approver_handles,
            dismisser_handles,
        })
    }

    /// Reviews and review comments of `pr`, fetched together
    pub async fn fetch_pr_activity(&self, pr: &PullRequest) -> Result<PrActivity, GitHubError> {
        self.fetch_activity(&pr.repository, pr.number).await
    }

    async fn fetch_activity(&self, repository: &str, number: u64) -> Result<PrActivity, GitHubError> {
        let reviews_route = format!("/repos/{repository}/pulls/{number}/reviews?per_page=100");
        let comments_route = format!("/repos/{repository}/pulls/{number}/comments?per_page=100");

        let (reviews, comments) = futures::try_join!(
            get_typed::<Vec<Review>>(self.api.as_ref(), &reviews_route),
            get_typed::<Vec<ReviewComment>>(self.api.as_ref(), &comments_route),
        )?;

        Ok(PrActivity { reviews, comments })
    }
}
