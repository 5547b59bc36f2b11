use crate::extract::{PrInfo, ReleaseInfo};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a pull request as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStatus {
    Open,
    Closed,
    Merged,
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PrStatus::Open => "open",
            PrStatus::Closed => "closed",
            PrStatus::Merged => "merged",
        };
        f.write_str(label)
    }
}

/// A pull request enriched with status and review activity counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Canonical `owner/repo`, taken from the PR detail response
    pub repository: String,
    pub comment_count: usize,
    pub approval_count: usize,
    pub dismissed_count: usize,
    pub approver_handles: Vec<String>,
    pub dismisser_handles: Vec<String>,
}

impl PullRequest {
    /// Identity used to scan each PR once across all members' result sets
    pub fn key(&self) -> (String, u64) {
        (self.repository.to_ascii_lowercase(), self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetail {
    pub id: u64,
    pub pr_number: u64,
    pub pr_title: String,
    pub repository: String,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub pr_created_at: DateTime<Utc>,
    pub url: String,
}

impl ReviewDetail {
    /// Hours between PR creation and this review, if it was submitted
    pub fn latency_hours(&self) -> Option<f64> {
        self.submitted_at
            .map(|submitted| (submitted - self.pr_created_at).num_seconds() as f64 / 3600.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    pub id: u64,
    pub pr_number: u64,
    pub pr_title: String,
    pub repository: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub url: String,
    pub author: String,
    pub pr_author: String,
}

/// Coarse recency window applied to the PR search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Week,
    TwoWeeks,
}

impl DateFilter {
    pub fn days(&self) -> Option<i64> {
        match self {
            DateFilter::All => None,
            DateFilter::Week => Some(7),
            DateFilter::TwoWeeks => Some(14),
        }
    }

    /// Earliest calendar date covered by the window, relative to `now`
    pub fn since(&self, now: DateTime<Utc>) -> Option<NaiveDate> {
        self.days().map(|days| (now - Duration::days(days)).date_naive())
    }

    /// Search qualifier, including its leading space, or empty for `All`
    pub fn search_qualifier(&self, now: DateTime<Utc>) -> String {
        match self.since(now) {
            Some(date) => format!(" updated:>={}", date.format("%Y-%m-%d")),
            None => String::new(),
        }
    }

    /// Whether `timestamp` falls on or after the first day of the window,
    /// matching the day granularity of the search qualifier
    pub fn is_in_range(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.since(now) {
            Some(date) => timestamp.date_naive() >= date,
            None => true,
        }
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(DateFilter::All),
            "week" | "7d" => Ok(DateFilter::Week),
            "two_weeks" | "two-weeks" | "14d" => Ok(DateFilter::TwoWeeks),
            other => Err(format!("unknown date filter '{other}' (all, week, two-weeks)")),
        }
    }
}

/// Paging and branch options forwarded to the workflow-runs query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub id: u64,
    pub name: String,
    pub workflow_id: u64,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    pub run_number: u64,
    pub run_attempt: u64,
    pub display_title: String,
    pub event: String,
    pub repository: String,
    pub branch: String,
    /// First seven characters of the head sha
    pub commit: String,
    pub commit_message: String,
    pub actor: String,
    pub jobs_url: String,
    pub artifacts_url: Option<String>,
    pub prs: Option<String>,
    pub pr_details: Option<Vec<PrInfo>>,
}

impl WorkflowRun {
    /// Case-insensitive substring match over the searchable text fields
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.name.as_str()),
            Some(self.display_title.as_str()),
            Some(self.actor.as_str()),
            Some(self.branch.as_str()),
            Some(self.commit.as_str()),
            Some(self.commit_message.as_str()),
            Some(self.repository.as_str()),
            Some(self.status.as_str()),
            self.conclusion.as_deref(),
            self.prs.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStep {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRun {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub steps: Vec<JobStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    pub parsed_releases: Option<Vec<ReleaseInfo>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    pub size_in_bytes: u64,
    pub archive_download_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_fixture() -> WorkflowRun {
        WorkflowRun {
            id: 1,
            name: "Mobile Release".to_string(),
            workflow_id: 99,
            status: "completed".to_string(),
            conclusion: Some("success".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 5, 19, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 19, 10, 30, 0).unwrap(),
            html_url: "https://github.com/acme/app/actions/runs/1".to_string(),
            run_number: 512,
            run_attempt: 1,
            display_title: "rc/beta-2.2.0".to_string(),
            event: "push".to_string(),
            repository: "acme/app".to_string(),
            branch: "rc/beta-2.2.0".to_string(),
            commit: "abc1234".to_string(),
            commit_message: "Bump version".to_string(),
            actor: "octocat".to_string(),
            jobs_url: "https://api.github.com/repos/acme/app/actions/runs/1/jobs".to_string(),
            artifacts_url: None,
            prs: Some("11696, 11697".to_string()),
            pr_details: None,
        }
    }

    #[test]
    fn test_date_filter_qualifier() {
        let now = Utc.with_ymd_and_hms(2025, 5, 19, 8, 0, 0).unwrap();

        assert_eq!(DateFilter::All.search_qualifier(now), "");
        assert_eq!(DateFilter::Week.search_qualifier(now), " updated:>=2025-05-12");
        assert_eq!(DateFilter::TwoWeeks.search_qualifier(now), " updated:>=2025-05-05");
    }

    #[test]
    fn test_date_filter_range() {
        let now = Utc.with_ymd_and_hms(2025, 5, 19, 8, 0, 0).unwrap();
        let ten_days_ago = now - Duration::days(10);

        assert!(DateFilter::All.is_in_range(ten_days_ago, now));
        assert!(!DateFilter::Week.is_in_range(ten_days_ago, now));
        assert!(DateFilter::TwoWeeks.is_in_range(ten_days_ago, now));
    }

    #[test]
    fn test_date_filter_range_covers_first_day() {
        let now = Utc.with_ymd_and_hms(2025, 5, 19, 8, 0, 0).unwrap();
        let early_on_first_day = Utc.with_ymd_and_hms(2025, 5, 12, 0, 5, 0).unwrap();
        let day_before = Utc.with_ymd_and_hms(2025, 5, 11, 23, 59, 0).unwrap();

        assert!(DateFilter::Week.is_in_range(early_on_first_day, now));
        assert!(!DateFilter::Week.is_in_range(day_before, now));
    }

    #[test]
    fn test_run_search_fields() {
        let run = run_fixture();

        assert!(run.matches_search(""));
        assert!(run.matches_search("OCTO"));
        assert!(run.matches_search("11697"));
        assert!(run.matches_search("abc12"));
        assert!(run.matches_search("success"));
        assert!(!run.matches_search("android"));
    }
}
