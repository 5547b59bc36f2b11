use super::TeamMember;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ranking-ready summary of one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub handle: String,
    #[serde(rename = "totalPRs")]
    pub total_prs: usize,
    pub total_comments_given: usize,
    pub total_approvals_given: usize,
    pub comments_received: usize,
    pub average_review_time_hours: Option<f64>,
    pub last_approval_date: Option<DateTime<Utc>>,
}

/// Project aggregates onto leaderboard entries, keeping input order
pub fn generate_leaderboard_data(team: &[TeamMember]) -> Vec<LeaderboardEntry> {
    team.iter()
        .map(|member| LeaderboardEntry {
            handle: member.handle.clone(),
            total_prs: member.prs.len(),
            total_comments_given: member.comments_given,
            total_approvals_given: member.approvals_given,
            comments_received: member.comments_received,
            average_review_time_hours: member.average_review_time_hours,
            last_approval_date: member.last_approval_date,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMetric {
    Prs,
    CommentsGiven,
    ApprovalsGiven,
    CommentsReceived,
    ReviewTime,
}

impl std::str::FromStr for LeaderboardMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "prs" => Ok(LeaderboardMetric::Prs),
            "comments" | "comments-given" => Ok(LeaderboardMetric::CommentsGiven),
            "approvals" | "approvals-given" => Ok(LeaderboardMetric::ApprovalsGiven),
            "received" | "comments-received" => Ok(LeaderboardMetric::CommentsReceived),
            "review-time" => Ok(LeaderboardMetric::ReviewTime),
            other => Err(format!(
                "unknown metric '{other}' (prs, comments, approvals, received, review-time)"
            )),
        }
    }
}

/// Stable sort: counts descending, review time ascending with unknowns last
pub fn rank_by(entries: &mut [LeaderboardEntry], metric: LeaderboardMetric) {
    match metric {
        LeaderboardMetric::Prs => entries.sort_by(|a, b| b.total_prs.cmp(&a.total_prs)),
        LeaderboardMetric::CommentsGiven => {
            entries.sort_by(|a, b| b.total_comments_given.cmp(&a.total_comments_given))
        }
        LeaderboardMetric::ApprovalsGiven => {
            entries.sort_by(|a, b| b.total_approvals_given.cmp(&a.total_approvals_given))
        }
        LeaderboardMetric::CommentsReceived => {
            entries.sort_by(|a, b| b.comments_received.cmp(&a.comments_received))
        }
        LeaderboardMetric::ReviewTime => entries.sort_by(|a, b| {
            match (a.average_review_time_hours, b.average_review_time_hours) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(handle: &str, comments: usize, approvals: usize, hours: Option<f64>) -> TeamMember {
        TeamMember {
            comments_given: comments,
            approvals_given: approvals,
            average_review_time_hours: hours,
            ..TeamMember::new(handle)
        }
    }

    #[test]
    fn test_projection_keeps_order_and_counts() {
        let team = vec![member("alice", 3, 1, Some(2.0)), member("bob", 0, 4, None)];

        let entries = generate_leaderboard_data(&team);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].handle, "alice");
        assert_eq!(entries[0].total_comments_given, 3);
        assert_eq!(entries[1].total_approvals_given, 4);
        assert_eq!(entries[1].total_prs, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let entries = generate_leaderboard_data(&[member("alice", 1, 1, None)]);
        let value = serde_json::to_value(&entries[0]).unwrap();

        assert_eq!(value["totalPRs"], 0);
        assert_eq!(value["totalCommentsGiven"], 1);
        assert!(value["averageReviewTimeHours"].is_null());
    }

    #[test]
    fn test_rank_by_review_time_puts_unknown_last() {
        let team = vec![
            member("slow", 0, 0, Some(30.0)),
            member("none", 0, 0, None),
            member("fast", 0, 0, Some(2.0)),
        ];
        let mut entries = generate_leaderboard_data(&team);

        rank_by(&mut entries, LeaderboardMetric::ReviewTime);

        let order: Vec<_> = entries.iter().map(|e| e.handle.as_str()).collect();
        assert_eq!(order, vec!["fast", "slow", "none"]);
    }

    #[test]
    fn test_rank_by_counts_is_stable() {
        let team = vec![member("a", 1, 0, None), member("b", 5, 0, None), member("c", 1, 0, None)];
        let mut entries = generate_leaderboard_data(&team);

        rank_by(&mut entries, "comments".parse().unwrap());

        let order: Vec<_> = entries.iter().map(|e| e.handle.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
