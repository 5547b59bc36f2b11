use super::{print_json, Command, CommandContext};
use crate::github::{ActionsHandler, FetchParams, WorkflowRun};
use anyhow::{Context, Result};

pub struct BuildsCommand {
    pub search: String,
    pub workflow: Option<String>,
    pub params: FetchParams,
    pub json: bool,
}

pub struct JobsCommand {
    pub run_id: u64,
    pub filter: String,
    pub logs: bool,
    pub json: bool,
}

pub struct LogsCommand {
    pub job_id: u64,
}

async fn actions_handler(ctx: &CommandContext) -> Result<ActionsHandler> {
    let settings = ctx.github_settings().await?;
    let workflows = ctx
        .store
        .load_workflow_settings()
        .await
        .context("Failed to load workflow settings")?;
    Ok(ActionsHandler::new(
        ctx.client(&settings)?,
        settings.repo_scope()?,
        workflows.workflow_ids,
    )
    .with_max_concurrency(ctx.config.http.max_concurrency))
}

fn status_icon(run: &WorkflowRun) -> &'static str {
    match (run.status.as_str(), run.conclusion.as_deref()) {
        ("completed", Some("success")) => "✅",
        ("completed", Some("failure")) => "❌",
        ("completed", Some("cancelled")) => "🚫",
        ("completed", _) => "⚪",
        _ => "🔄",
    }
}

impl Command for BuildsCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let handler = actions_handler(ctx).await?;
        let runs = handler
            .fetch_workflow_runs(&self.search, self.workflow.as_deref(), &self.params)
            .await;

        if self.json {
            return print_json(&runs);
        }

        println!("🏗️  WORKFLOW RUNS");
        println!("================");
        if runs.is_empty() {
            println!("📋 No runs found");
            println!();
            println!("🎯 QUICK START:");
            println!("   → Track a workflow: team-pulse settings workflows add <id> --name <name>");
            println!("   → Clear the filter: team-pulse builds");
            return Ok(());
        }
        for run in &runs {
            println!();
            println!(
                "{} {} #{}.{} - {}",
                status_icon(run),
                run.name,
                run.run_number,
                run.run_attempt,
                run.display_title
            );
            println!(
                "   🌿 {} @ {} by {} ({})",
                run.branch,
                run.commit,
                run.actor,
                run.created_at.format("%Y-%m-%d %H:%M")
            );
            if let Some(prs) = run.prs.as_deref().filter(|prs| !prs.is_empty()) {
                println!("   🔗 PRs: {prs}");
            }
            println!("   🆔 run {}  {}", run.id, run.html_url);
        }
        Ok(())
    }
}

impl Command for JobsCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let handler = actions_handler(ctx).await?;
        let run = handler.fetch_workflow_run(self.run_id).await?;
        let mut jobs = handler.load_job_details(&run, &self.filter).await;
        if !self.logs {
            for job in &mut jobs {
                job.logs = None;
            }
        }

        if self.json {
            return print_json(&jobs);
        }

        println!("📦 JOBS FOR RUN {} ({})", run.id, run.display_title);
        println!("==============================");
        if let Some(details) = &run.pr_details {
            for pr in details {
                println!("🔗 #{} {}", pr.number, pr.title);
            }
        }
        if jobs.is_empty() {
            println!("📋 No jobs matching '{}'", self.filter);
            return Ok(());
        }
        for job in &jobs {
            println!();
            println!(
                "⚙️  {} [{}{}]",
                job.name,
                job.status,
                job.conclusion
                    .as_deref()
                    .map(|c| format!(", {c}"))
                    .unwrap_or_default()
            );
            match &job.parsed_releases {
                Some(releases) if !releases.is_empty() => {
                    for release in releases {
                        println!(
                            "   🚀 {} {} ({})",
                            release.platform, release.version, release.build_number
                        );
                    }
                }
                Some(_) => println!("   📭 No releases in log"),
                None => println!("   ⚠️  Log unavailable"),
            }
            if let Some(logs) = &job.logs {
                println!("{logs}");
            }
        }
        Ok(())
    }
}

impl Command for LogsCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let handler = actions_handler(ctx).await?;
        let logs = handler.fetch_job_logs(self.job_id).await?;
        print!("{logs}");
        Ok(())
    }
}
