use anyhow::{Context, Result};
use clap::Parser;
use team_pulse::cli::commands::builds::{BuildsCommand, JobsCommand, LogsCommand};
use team_pulse::cli::commands::extract::ExtractCommand as Extract;
use team_pulse::cli::commands::init_config::InitConfigCommand;
use team_pulse::cli::commands::settings::SettingsCommand as Settings;
use team_pulse::cli::commands::team::{LeaderboardCommand, TeamCommand};
use team_pulse::cli::commands::{show_how_to_get_started, Command, CommandContext};
use team_pulse::cli::{
    Cli, Commands, ExtractCommand, MembersCommand, SettingsCommand, WorkflowsCommand,
};
use team_pulse::github::FetchParams;
use team_pulse::settings::WorkflowConfig;
use team_pulse::{init_telemetry, DashboardConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A malformed .env is reported but does not stop the command
    let env_file = DashboardConfig::load_env_file();
    let config = DashboardConfig::load().context("Failed to load configuration")?;

    let mut observability = config.observability.clone();
    if cli.verbose {
        observability.log_level = "debug".to_string();
    }
    init_telemetry(&observability)?;
    match env_file {
        Ok(true) => tracing::info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring malformed .env file"),
    }

    let Some(command) = cli.command else {
        return tokio::runtime::Runtime::new()?.block_on(show_how_to_get_started());
    };

    let ctx = CommandContext::new(config);
    tokio::runtime::Runtime::new()?.block_on(run(command, &ctx))
}

async fn run(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Team { since, json } => TeamCommand { since, json }.execute(ctx).await,
        Commands::Leaderboard { since, sort, json } => {
            LeaderboardCommand { since, sort, json }.execute(ctx).await
        }
        Commands::Builds {
            search,
            workflow,
            page,
            per_page,
            branch,
            json,
        } => {
            BuildsCommand {
                search,
                workflow,
                params: FetchParams {
                    page,
                    per_page,
                    branch,
                },
                json,
            }
            .execute(ctx)
            .await
        }
        Commands::Jobs {
            run_id,
            filter,
            logs,
            json,
        } => {
            JobsCommand {
                run_id,
                filter,
                logs,
                json,
            }
            .execute(ctx)
            .await
        }
        Commands::Logs { job_id } => LogsCommand { job_id }.execute(ctx).await,
        Commands::Extract { command } => {
            let extract = match command {
                ExtractCommand::Releases { file, json } => Extract::Releases { file, json },
                ExtractCommand::Notes { file, json } => Extract::Notes { file, json },
                ExtractCommand::Archive { file, json } => Extract::Archive { file, json },
            };
            extract.execute(ctx).await
        }
        Commands::Settings { command } => {
            let settings = match command {
                SettingsCommand::Show { json } => Settings::Show { json },
                SettingsCommand::Set {
                    token,
                    base_url,
                    organization,
                    repository,
                } => Settings::Set {
                    token,
                    base_url,
                    organization,
                    repository,
                },
                SettingsCommand::Members { command } => match command {
                    MembersCommand::List => Settings::ListMembers,
                    MembersCommand::Add { handle } => Settings::AddMember(handle),
                    MembersCommand::Remove { handle } => Settings::RemoveMember(handle),
                },
                SettingsCommand::Workflows { command } => match command {
                    WorkflowsCommand::List => Settings::ListWorkflows,
                    WorkflowsCommand::Add {
                        id,
                        name,
                        page_size,
                    } => {
                        let display_name = name.unwrap_or_else(|| format!("Workflow {id}"));
                        Settings::AddWorkflow(WorkflowConfig {
                            id,
                            display_name,
                            page_size,
                        })
                    }
                    WorkflowsCommand::Update {
                        id,
                        name,
                        page_size,
                    } => Settings::UpdateWorkflow {
                        id,
                        name,
                        page_size,
                    },
                    WorkflowsCommand::Remove { id } => Settings::RemoveWorkflow(id),
                },
            };
            settings.execute(ctx).await
        }
        Commands::InitConfig { path, force } => InitConfigCommand { path, force }.execute(ctx).await,
    }
}
