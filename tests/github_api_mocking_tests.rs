//! GitHub API mocking tests
//!
//! These tests run the real rate-limited client against a wiremock server,
//! so headers, query strings and status handling are checked end to end.

use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::sync::Arc;
use team_pulse::config::HttpConfig;
use team_pulse::github::{ActionsHandler, DateFilter, FetchParams, GitHubApi, GitHubError, PullRequestHandler};
use team_pulse::http::RateLimitedHttpClient;
use team_pulse::settings::{RepoScope, WorkflowConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// GitHub API mock server for deterministic testing
pub struct GitHubApiMock {
    pub server: MockServer,
    pub base_url: String,
}

impl GitHubApiMock {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn client(&self, cache_ttl_seconds: u64) -> Arc<RateLimitedHttpClient> {
        let config = HttpConfig {
            cache_ttl_seconds,
            ..HttpConfig::default()
        };
        Arc::new(RateLimitedHttpClient::new("mock-token", &self.base_url, &config).unwrap())
    }

    pub async fn mock_json(&self, route: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub fn raw_run(&self, id: u64, created_at: &str) -> Value {
        json!({
            "id": id,
            "name": "Mobile Release",
            "workflow_id": 99,
            "status": "completed",
            "conclusion": "success",
            "created_at": created_at,
            "updated_at": created_at,
            "html_url": format!("https://github.com/acme/app/actions/runs/{id}"),
            "run_number": id,
            "run_attempt": 1,
            "display_title": format!("run {id}"),
            "event": "push",
            "repository": {"full_name": "acme/app"},
            "head_branch": "main",
            "head_sha": "abcdef0123456789",
            "head_commit": {"message": "Bump version"},
            "actor": {"login": "octocat"},
            "jobs_url": format!("{}/repos/acme/app/actions/runs/{id}/jobs", self.base_url)
        })
    }
}

fn scope() -> RepoScope {
    RepoScope::Repository {
        owner: "acme".to_string(),
        name: "app".to_string(),
    }
}

fn notes_zip(text: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("release-notes.md", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(text.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn test_requests_carry_token_and_accept_headers() {
    let mock = GitHubApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app/pulls/1"))
        .and(header("authorization", "token mock-token"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 1})))
        .expect(1)
        .mount(&mock.server)
        .await;

    let value = mock.client(0).get_json("/repos/acme/app/pulls/1").await.unwrap();

    assert_eq!(value["number"], 1);
}

#[tokio::test]
async fn test_error_status_maps_to_http_error() {
    let mock = GitHubApiMock::new().await;
    mock.mock_json("/repos/acme/missing/pulls/1", 404, json!({"message": "Not Found"}))
        .await;

    let err = mock
        .client(0)
        .get_json("/repos/acme/missing/pulls/1")
        .await
        .unwrap_err();

    match err {
        GitHubError::Http { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_responses_are_cached() {
    let mock = GitHubApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"full_name": "acme/app"})))
        .expect(1)
        .mount(&mock.server)
        .await;
    let client = mock.client(60);

    client.get_json("/repos/acme/app").await.unwrap();
    let second = client.get_json("/repos/acme/app").await.unwrap();

    assert_eq!(second["full_name"], "acme/app");
}

#[tokio::test]
async fn test_search_query_reaches_server() {
    let mock = GitHubApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "repo:acme/app author:alice is:pr"))
        .and(query_param("sort", "updated"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_count": 0, "items": []})))
        .expect(1)
        .mount(&mock.server)
        .await;
    let handler = PullRequestHandler::new(mock.client(0), scope());

    let pulls = handler
        .fetch_pull_requests_for_user("alice", DateFilter::All, 10)
        .await
        .unwrap();

    assert!(pulls.is_empty());
}

#[tokio::test]
async fn test_workflow_runs_merge_artifact_prs() {
    let mock = GitHubApiMock::new().await;
    mock.mock_json(
        "/repos/acme/app/actions/workflows/99/runs",
        200,
        json!({
            "total_count": 2,
            "workflow_runs": [
                mock.raw_run(1, "2025-05-18T10:00:00Z"),
                mock.raw_run(2, "2025-05-19T10:00:00Z")
            ]
        }),
    )
    .await;
    mock.mock_json(
        "/repos/acme/app/actions/runs/1/artifacts",
        200,
        json!({"artifacts": [{
            "id": 5,
            "name": "release-notes",
            "size_in_bytes": 64,
            "archive_download_url": format!("{}/repos/acme/app/actions/artifacts/5/zip", mock.base_url)
        }]}),
    )
    .await;
    mock.mock_json("/repos/acme/app/actions/runs/2/artifacts", 500, json!({"message": "boom"}))
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app/actions/artifacts/5/zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(notes_zip(
            "- feat: Add new feature (#[11697])\n- fix: Login button (#[11698])\n",
        )))
        .mount(&mock.server)
        .await;

    let handler = ActionsHandler::new(mock.client(0), scope(), vec![WorkflowConfig::from_legacy_id("99")]);
    let runs = handler.fetch_workflow_runs("", None, &FetchParams::default()).await;

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, 2, "newest run first");
    assert_eq!(runs[0].prs.as_deref(), Some(""));
    assert_eq!(runs[1].prs.as_deref(), Some("11697, 11698"));
    assert_eq!(runs[1].pr_details.as_ref().unwrap()[1].title, "fix: Login button");
    assert_eq!(runs[1].commit, "abcdef0");
}

#[tokio::test]
async fn test_job_logs_are_returned_raw() {
    let mock = GitHubApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/app/actions/jobs/10/logs"))
        .and(header("authorization", "token mock-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "2025-05-19T10:00:00Z Uploaded APK successfully and created release 2.3.1 (456)\n",
        ))
        .mount(&mock.server)
        .await;
    let handler = ActionsHandler::new(mock.client(0), scope(), Vec::new());

    let logs = handler.fetch_job_logs(10).await.unwrap();

    assert!(logs.contains("created release 2.3.1 (456)"));
    let releases = team_pulse::extract_release_info(&logs);
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].version, "2.3.1");
}
