//! In-process GitHub stand-in for integration tests.
//!
//! Routes are matched on their path (query string ignored). Searches are
//! matched by the `author:` qualifier so each handle can get its own result
//! set.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use team_pulse::github::{GitHubApi, GitHubError};

pub const REPO: &str = "acme/app";

#[derive(Default)]
pub struct FakeGitHub {
    json: HashMap<String, Value>,
    searches: HashMap<String, Value>,
    text: HashMap<String, String>,
    bytes: HashMap<String, Vec<u8>>,
    failures: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

fn path_of(route: &str) -> &str {
    route.split('?').next().unwrap_or(route)
}

fn search_author(route: &str) -> Option<String> {
    let start = route.find("author%3A")? + "author%3A".len();
    let rest = &route[start..];
    let end = rest.find("%20").unwrap_or(rest.len());
    Some(rest[..end].to_ascii_lowercase())
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, body: Value) -> Self {
        self.json.insert(path.to_string(), body);
        self
    }

    pub fn search(mut self, handle: &str, items: Vec<Value>) -> Self {
        self.searches.insert(
            handle.to_ascii_lowercase(),
            json!({"total_count": items.len(), "items": items}),
        );
        self
    }

    pub fn text(mut self, path: &str, body: &str) -> Self {
        self.text.insert(path.to_string(), body.to_string());
        self
    }

    pub fn bytes(mut self, path: &str, body: Vec<u8>) -> Self {
        self.bytes.insert(path.to_string(), body);
        self
    }

    /// Every request to `path` (or search for `handle` when prefixed with
    /// `search:`) answers 500
    pub fn fail(mut self, key: &str) -> Self {
        self.failures.insert(key.to_string());
        self
    }

    /// Register a PR: detail plus its reviews and review comments
    pub fn pull(self, number: u64, reviews: Vec<Value>, comments: Vec<Value>) -> Self {
        self.route(
            &format!("https://api.github.com/repos/{REPO}/pulls/{number}"),
            json!({"state": "open", "merged": false, "base": {"repo": {"full_name": REPO}}}),
        )
        .route(&format!("/repos/{REPO}/pulls/{number}/reviews"), Value::Array(reviews))
        .route(&format!("/repos/{REPO}/pulls/{number}/comments"), Value::Array(comments))
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| path_of(called) == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, route: &str) {
        self.calls.lock().unwrap().push(route.to_string());
    }

    fn failure(&self, key: &str) -> Result<(), GitHubError> {
        if self.failures.contains(key) {
            return Err(GitHubError::Http {
                status: 500,
                body: format!("forced failure for {key}"),
            });
        }
        Ok(())
    }

    fn not_found(route: &str) -> GitHubError {
        GitHubError::Http {
            status: 404,
            body: format!("no fixture for {route}"),
        }
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn get_json(&self, route: &str) -> Result<Value, GitHubError> {
        self.record(route);
        if let Some(handle) = search_author(route) {
            self.failure(&format!("search:{handle}"))?;
            return Ok(self
                .searches
                .get(&handle)
                .cloned()
                .unwrap_or_else(|| json!({"total_count": 0, "items": []})));
        }
        let path = path_of(route);
        self.failure(path)?;
        self.json.get(path).cloned().ok_or_else(|| Self::not_found(route))
    }

    async fn get_text(&self, route: &str) -> Result<String, GitHubError> {
        self.record(route);
        let path = path_of(route);
        self.failure(path)?;
        self.text.get(path).cloned().ok_or_else(|| Self::not_found(route))
    }

    async fn get_bytes(&self, route: &str) -> Result<Vec<u8>, GitHubError> {
        self.record(route);
        let path = path_of(route);
        self.failure(path)?;
        self.bytes.get(path).cloned().ok_or_else(|| Self::not_found(route))
    }
}

pub fn search_item(number: u64, author: &str, created_at: &str) -> Value {
    json!({
        "id": 1000 + number,
        "number": number,
        "title": format!("PR {number}"),
        "html_url": format!("https://github.com/{REPO}/pull/{number}"),
        "user": {"login": author},
        "created_at": created_at,
        "updated_at": created_at,
        "pull_request": {"url": format!("https://api.github.com/repos/{REPO}/pulls/{number}")}
    })
}

pub fn review(id: u64, user: &str, state: &str, body: &str, submitted_at: &str) -> Value {
    json!({
        "id": id,
        "user": {"login": user},
        "state": state,
        "body": body,
        "submitted_at": submitted_at
    })
}

pub fn comment(id: u64, user: &str, body: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "user": {"login": user},
        "body": body,
        "created_at": created_at
    })
}
