//! Team aggregation against an in-process GitHub fake

mod fixtures;

use chrono::{TimeZone, Utc};
use fixtures::{comment, review, search_item, FakeGitHub};
use std::sync::Arc;
use team_pulse::github::{DateFilter, GitHubError, PullRequestHandler};
use team_pulse::settings::{GitHubSettings, RepoScope};
use team_pulse::team::{generate_leaderboard_data, TeamAggregator, TeamMember};

fn scope() -> RepoScope {
    RepoScope::Repository {
        owner: "acme".to_string(),
        name: "app".to_string(),
    }
}

fn aggregator(fake: &Arc<FakeGitHub>, members: &[&str]) -> TeamAggregator {
    let api: Arc<dyn team_pulse::GitHubApi> = fake.clone();
    TeamAggregator::new(
        PullRequestHandler::new(api, scope()),
        members.iter().map(|m| m.to_string()).collect(),
    )
}

fn member<'a>(team: &'a [TeamMember], handle: &str) -> &'a TeamMember {
    team.iter().find(|m| m.handle == handle).unwrap()
}

fn review_scenario() -> FakeGitHub {
    FakeGitHub::new()
        .search(
            "alice",
            vec![
                search_item(1, "alice", "2025-05-01T10:00:00Z"),
                search_item(3, "alice", "2025-05-03T10:00:00Z"),
            ],
        )
        .search("bob", vec![search_item(2, "bob", "2025-05-02T00:00:00Z")])
        .pull(
            1,
            vec![
                review(1, "alice", "COMMENTED", "self note", "2025-05-01T11:00:00Z"),
                review(2, "bob", "APPROVED", "", "2025-05-01T12:00:00Z"),
                review(3, "bob", "COMMENTED", "nit", "2025-05-01T12:30:00Z"),
                review(4, "carol", "COMMENTED", "lgtm", "2025-05-01T13:00:00Z"),
            ],
            vec![
                comment(10, "bob", "typo", "2025-05-01T12:10:00Z"),
                comment(11, "alice", "fixed", "2025-05-01T12:20:00Z"),
            ],
        )
        .pull(
            2,
            vec![review(5, "alice", "APPROVED", "", "2025-05-02T05:00:00Z")],
            vec![],
        )
        .pull(
            3,
            vec![review(6, "bob", "APPROVED", "", "2025-05-03T14:00:00Z")],
            vec![],
        )
}

#[tokio::test]
async fn test_activity_is_attributed_to_reviewers_and_authors() {
    let fake = Arc::new(review_scenario());

    let team = aggregator(&fake, &["alice", "bob"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    let alice = member(&team, "alice");
    assert_eq!(alice.prs.len(), 2);
    assert_eq!(alice.approvals_given, 1);
    assert_eq!(alice.comments_given, 0, "own notes are not comments given");
    assert_eq!(alice.comments_received, 3);
    let commenters: Vec<_> = alice.comments_from_others.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(commenters, vec!["bob", "carol", "bob"]);

    let bob = member(&team, "bob");
    assert_eq!(bob.approvals_given, 2);
    assert_eq!(bob.comments_given, 2);
    assert_eq!(bob.comments_received, 0);
    assert!(bob.comment_details.iter().all(|c| c.pr_author == "alice"));
}

#[tokio::test]
async fn test_review_time_and_last_approval_are_derived() {
    let fake = Arc::new(review_scenario());

    let team = aggregator(&fake, &["alice", "bob"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    let bob = member(&team, "bob");
    assert_eq!(bob.average_review_time_hours, Some(3.0));
    assert_eq!(
        bob.last_approval_date,
        Some(Utc.with_ymd_and_hms(2025, 5, 3, 14, 0, 0).unwrap())
    );
    assert_eq!(member(&team, "alice").average_review_time_hours, Some(5.0));
}

#[tokio::test]
async fn test_failed_member_search_leaves_empty_aggregate() {
    let fake = Arc::new(review_scenario().fail("search:ghost-user"));

    let team = aggregator(&fake, &["alice", "ghost-user", "bob"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    let handles: Vec<_> = team.iter().map(|m| m.handle.as_str()).collect();
    assert_eq!(handles, vec!["alice", "ghost-user", "bob"]);

    let ghost = member(&team, "ghost-user");
    assert!(ghost.prs.is_empty());
    assert_eq!(ghost.approvals_given, 0);
    assert_eq!(ghost.average_review_time_hours, None);
    assert_eq!(member(&team, "bob").approvals_given, 2);
}

#[tokio::test]
async fn test_shared_pr_is_attributed_once() {
    let fake = Arc::new(
        FakeGitHub::new()
            .search("alice", vec![search_item(1, "alice", "2025-05-01T10:00:00Z")])
            .search("bob", vec![search_item(1, "alice", "2025-05-01T10:00:00Z")])
            .pull(
                1,
                vec![review(2, "bob", "APPROVED", "", "2025-05-01T12:00:00Z")],
                vec![],
            ),
    );

    let team = aggregator(&fake, &["alice", "bob"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    assert_eq!(member(&team, "bob").approvals_given, 1);
    // one enrichment per search hit, one activity scan
    assert_eq!(fake.calls_to("/repos/acme/app/pulls/1/reviews"), 3);
}

#[tokio::test]
async fn test_handles_match_ignoring_case() {
    let fake = Arc::new(review_scenario());

    let team = aggregator(&fake, &["Alice", "BOB", "alice"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    assert_eq!(team.len(), 2);
    assert_eq!(member(&team, "BOB").approvals_given, 2);
    assert_eq!(member(&team, "Alice").comments_received, 3);
}

#[tokio::test]
async fn test_empty_team_fails_before_any_request() {
    let fake = Arc::new(FakeGitHub::new());

    let err = aggregator(&fake, &[" "])
        .fetch_team_data(DateFilter::Week)
        .await
        .unwrap_err();

    assert!(matches!(err, GitHubError::ConfigurationMissing(field) if field == "teamMembers"));
    assert_eq!(fake.total_calls(), 0);

    let settings = GitHubSettings {
        organization: "acme".to_string(),
        repository: "app".to_string(),
        ..Default::default()
    };
    assert!(TeamAggregator::from_settings(fake.clone(), &settings).is_err());
}

#[tokio::test]
async fn test_leaderboard_projects_aggregates() {
    let fake = Arc::new(review_scenario());
    let team = aggregator(&fake, &["alice", "bob"])
        .fetch_team_data(DateFilter::All)
        .await
        .unwrap();

    let entries = generate_leaderboard_data(&team);

    assert_eq!(entries[0].handle, "alice");
    assert_eq!(entries[0].total_prs, 2);
    assert_eq!(entries[0].comments_received, 3);
    assert_eq!(entries[1].total_approvals_given, 2);
    assert_eq!(entries[1].average_review_time_hours, Some(3.0));
}
