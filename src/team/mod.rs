//! Team activity aggregation and the leaderboard projection built on it.

pub mod aggregator;
pub mod leaderboard;

pub use aggregator::{AggregationPhase, TeamAggregator};
pub use leaderboard::{generate_leaderboard_data, rank_by, LeaderboardEntry, LeaderboardMetric};

use crate::github::{CommentDetail, PullRequest, ReviewDetail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity aggregate for one tracked handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub handle: String,
    /// PRs authored by this member
    pub prs: Vec<PullRequest>,
    pub comments_given: usize,
    pub comments_received: usize,
    /// APPROVED and DISMISSED reviews on other people's PRs
    pub approvals_given: usize,
    pub review_details: Vec<ReviewDetail>,
    pub comment_details: Vec<CommentDetail>,
    pub comments_from_others: Vec<CommentDetail>,
    pub last_approval_date: Option<DateTime<Utc>>,
    pub average_review_time_hours: Option<f64>,
}

impl TeamMember {
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
            prs: Vec::new(),
            comments_given: 0,
            comments_received: 0,
            approvals_given: 0,
            review_details: Vec::new(),
            comment_details: Vec::new(),
            comments_from_others: Vec::new(),
            last_approval_date: None,
            average_review_time_hours: None,
        }
    }
}
