// GitHub Actions reads: workflow runs, their artifacts, jobs and raw logs
use super::api::{get_typed, GitHubApi};
use super::errors::GitHubError;
use super::models::{ArtifactsResponse, JobsResponse, RawArtifact, RawJob, RawWorkflowRun, WorkflowRunsResponse};
use super::pulls::DEFAULT_MAX_CONCURRENCY;
use super::types::{Artifact, FetchParams, JobRun, JobStep, WorkflowRun};
use crate::extract::{extract_from_archive, extract_release_info, ArtifactData};
use crate::settings::{RepoScope, WorkflowConfig, DEFAULT_PAGE_SIZE};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name filter used by the build dialog to pick the publishing jobs
pub const DEFAULT_JOB_FILTER: &str = "build-publish";

const UNKNOWN: &str = "unknown";

#[derive(Clone)]
pub struct ActionsHandler {
    api: Arc<dyn GitHubApi>,
    scope: RepoScope,
    workflows: Vec<WorkflowConfig>,
    max_concurrency: usize,
}

impl ActionsHandler {
    pub fn new(api: Arc<dyn GitHubApi>, scope: RepoScope, workflows: Vec<WorkflowConfig>) -> Self {
        Self {
            api,
            scope,
            workflows,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    fn repo_path(&self) -> String {
        self.scope.actions_path()
    }

    fn runs_route(&self, workflow: &WorkflowConfig, params: &FetchParams) -> String {
        let per_page = params
            .per_page
            .or((workflow.page_size > 0).then_some(workflow.page_size))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let mut route = format!(
            "/repos/{}/actions/workflows/{}/runs?per_page={}&page={}",
            self.repo_path(),
            urlencoding::encode(&workflow.id),
            per_page,
            params.page.unwrap_or(1)
        );
        if let Some(branch) = params.branch.as_deref().filter(|b| !b.is_empty()) {
            route.push_str("&branch=");
            route.push_str(&urlencoding::encode(branch));
        }
        route
    }

    /// Runs of the tracked workflows (or only `workflow_id`), newest first.
    ///
    /// A workflow whose listing fails is skipped. Each run carries the PR
    /// references recovered from its first artifact, `prs` stays empty when
    /// that lookup fails. `search` is applied last.
    pub async fn fetch_workflow_runs(
        &self,
        search: &str,
        workflow_id: Option<&str>,
        params: &FetchParams,
    ) -> Vec<WorkflowRun> {
        let selected: Vec<WorkflowConfig> = match workflow_id {
            Some(id) => vec![self
                .workflows
                .iter()
                .find(|wf| wf.id == id)
                .cloned()
                .unwrap_or_else(|| WorkflowConfig::from_legacy_id(id))],
            None => self.workflows.clone(),
        };

        if selected.is_empty() {
            info!("No workflows configured, nothing to fetch");
            return Vec::new();
        }

        let listings: Vec<Vec<WorkflowRun>> = stream::iter(selected)
            .map(|workflow| async move {
                match self.fetch_runs_for(&workflow, params).await {
                    Ok(runs) => runs,
                    Err(e) => {
                        warn!(workflow = %workflow.id, error = %e, "Failed to fetch workflow runs, skipping");
                        Vec::new()
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut runs: Vec<WorkflowRun> = listings.into_iter().flatten().collect();
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let enriched: Vec<WorkflowRun> = stream::iter(runs)
            .map(|run| self.attach_artifact_data(run))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        enriched
            .into_iter()
            .filter(|run| run.matches_search(search))
            .collect()
    }

    async fn fetch_runs_for(
        &self,
        workflow: &WorkflowConfig,
        params: &FetchParams,
    ) -> Result<Vec<WorkflowRun>, GitHubError> {
        let route = self.runs_route(workflow, params);
        let response: WorkflowRunsResponse = get_typed(self.api.as_ref(), &route).await?;
        debug!(
            workflow = %workflow.id,
            total = response.total_count,
            returned = response.workflow_runs.len(),
            "Workflow runs listed"
        );

        Ok(response
            .workflow_runs
            .into_iter()
            .map(|raw| self.convert_run(raw))
            .collect())
    }

    fn convert_run(&self, raw: RawWorkflowRun) -> WorkflowRun {
        let name = raw.name.unwrap_or_default();
        let display_title = raw
            .display_title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| name.clone());
        let commit = raw
            .head_sha
            .map(|sha| sha.chars().take(7).collect())
            .unwrap_or_else(|| UNKNOWN.to_string());

        WorkflowRun {
            id: raw.id,
            name,
            workflow_id: raw.workflow_id,
            status: raw.status.unwrap_or_else(|| UNKNOWN.to_string()),
            conclusion: raw.conclusion,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            html_url: raw.html_url,
            run_number: raw.run_number,
            run_attempt: raw.run_attempt.unwrap_or(1),
            display_title,
            event: raw.event,
            repository: raw
                .repository
                .map(|repo| repo.full_name)
                .unwrap_or_else(|| self.repo_path()),
            branch: raw.head_branch.unwrap_or_else(|| UNKNOWN.to_string()),
            commit,
            commit_message: raw
                .head_commit
                .map(|c| c.message)
                .unwrap_or_else(|| "No commit message".to_string()),
            actor: raw
                .actor
                .map(|actor| actor.login)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            jobs_url: raw.jobs_url,
            artifacts_url: raw.artifacts_url,
            prs: None,
            pr_details: None,
        }
    }

    async fn attach_artifact_data(&self, mut run: WorkflowRun) -> WorkflowRun {
        match self.fetch_run_artifact_data(run.id).await {
            Ok(Some(data)) => {
                run.prs = Some(data.prs);
                run.pr_details = Some(data.pr_details);
            }
            Ok(None) => {
                run.prs = Some(String::new());
            }
            Err(e) => {
                warn!(run_id = run.id, error = %e, "Failed to read run artifact");
                run.prs = Some(String::new());
            }
        }
        run
    }

    /// A single run by id, with its artifact data attached
    pub async fn fetch_workflow_run(&self, run_id: u64) -> Result<WorkflowRun, GitHubError> {
        let route = format!("/repos/{}/actions/runs/{}", self.repo_path(), run_id);
        let raw: RawWorkflowRun = get_typed(self.api.as_ref(), &route).await?;
        Ok(self.attach_artifact_data(self.convert_run(raw)).await)
    }

    pub async fn fetch_workflow_artifacts(&self, run_id: u64) -> Result<Vec<Artifact>, GitHubError> {
        let route = format!("/repos/{}/actions/runs/{}/artifacts", self.repo_path(), run_id);
        let response: ArtifactsResponse = get_typed(self.api.as_ref(), &route).await?;
        Ok(response.artifacts.into_iter().map(convert_artifact).collect())
    }

    /// PR references from the run's first artifact; `None` if it has none
    pub async fn fetch_run_artifact_data(
        &self,
        run_id: u64,
    ) -> Result<Option<ArtifactData>, GitHubError> {
        let artifacts = self.fetch_workflow_artifacts(run_id).await?;
        let Some(first) = artifacts.first() else {
            debug!(run_id, "Run has no artifacts");
            return Ok(None);
        };

        let archive = self.api.get_bytes(&first.archive_download_url).await?;
        let data = extract_from_archive(&archive)?;
        debug!(run_id, artifact = %first.name, prs = %data.prs, "Artifact PR references read");
        Ok(Some(data))
    }

    /// Jobs of `run` with their ordered steps; empty if the listing fails
    pub async fn fetch_workflow_jobs(&self, run: &WorkflowRun) -> Vec<JobRun> {
        match get_typed::<JobsResponse>(self.api.as_ref(), &run.jobs_url).await {
            Ok(response) => response.jobs.into_iter().map(convert_job).collect(),
            Err(e) => {
                warn!(run_id = run.id, error = %e, "Failed to fetch jobs for run");
                Vec::new()
            }
        }
    }

    /// Raw plain-text log of a job
    pub async fn fetch_job_logs(&self, job_id: u64) -> Result<String, GitHubError> {
        let route = format!("/repos/{}/actions/jobs/{}/logs", self.repo_path(), job_id);
        self.api.get_text(&route).await
    }

    /// Jobs whose name contains `name_filter`, with logs and parsed release
    /// records attached. A job whose log cannot be read keeps both unset.
    pub async fn load_job_details(&self, run: &WorkflowRun, name_filter: &str) -> Vec<JobRun> {
        let needle = name_filter.to_lowercase();
        let jobs: Vec<JobRun> = self
            .fetch_workflow_jobs(run)
            .await
            .into_iter()
            .filter(|job| job.name.to_lowercase().contains(&needle))
            .collect();

        stream::iter(jobs)
            .map(|mut job| async move {
                match self.fetch_job_logs(job.id).await {
                    Ok(logs) => {
                        job.parsed_releases = Some(extract_release_info(&logs));
                        job.logs = Some(logs);
                    }
                    Err(e) => {
                        warn!(job_id = job.id, error = %e, "Failed to fetch job logs");
                    }
                }
                job
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }
}

fn convert_job(raw: RawJob) -> JobRun {
    JobRun {
        id: raw.id,
        name: raw.name,
        status: raw.status,
        conclusion: raw.conclusion,
        started_at: raw.started_at,
        completed_at: raw.completed_at,
        steps: raw
            .steps
            .unwrap_or_default()
            .into_iter()
            .map(|step| JobStep {
                name: step.name,
                status: step.status,
                conclusion: step.conclusion,
                number: step.number,
            })
            .collect(),
        logs: None,
        parsed_releases: None,
    }
}

fn convert_artifact(raw: RawArtifact) -> Artifact {
    Artifact {
        id: raw.id,
        name: raw.name,
        size_in_bytes: raw.size_in_bytes,
        archive_download_url: raw.archive_download_url,
        expires_at: raw.expires_at,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}
