use super::{print_json, Command, CommandContext};
use crate::settings::WorkflowConfig;
use anyhow::Result;
use serde_json::json;

pub enum SettingsCommand {
    Show {
        json: bool,
    },
    Set {
        token: Option<String>,
        base_url: Option<String>,
        organization: Option<String>,
        repository: Option<String>,
    },
    ListMembers,
    AddMember(String),
    RemoveMember(String),
    ListWorkflows,
    AddWorkflow(WorkflowConfig),
    UpdateWorkflow {
        id: String,
        name: Option<String>,
        page_size: Option<u32>,
    },
    RemoveWorkflow(String),
}

impl Command for SettingsCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let store = &ctx.store;
        match self {
            SettingsCommand::Show { json } => {
                let github = store.load_github_settings().await?;
                let workflows = store.load_workflow_settings().await?;
                let token_state = if github.token.is_empty() { "unset" } else { "set" };

                if *json {
                    return print_json(&json!({
                        "token": token_state,
                        "baseUrl": github.base_url_or(&ctx.config.github.base_url),
                        "organization": github.organization,
                        "repository": github.repository,
                        "teamMembers": github.tracked_members,
                        "workflowIds": workflows.workflow_ids,
                    }));
                }

                println!("⚙️  SETTINGS");
                println!("===========");
                println!("🔑 Token: {token_state}");
                println!("🌐 Base URL: {}", github.base_url_or(&ctx.config.github.base_url));
                println!("🏢 Organization: {}", github.organization);
                println!("📁 Repository: {}", github.repository);
                println!("👥 Members: {}", github.tracked_members.join(", "));
                println!("🏗️  Workflows:");
                for wf in &workflows.workflow_ids {
                    println!("   {} - {} (page size {})", wf.id, wf.display_name, wf.page_size);
                }
            }
            SettingsCommand::Set {
                token,
                base_url,
                organization,
                repository,
            } => {
                let mut github = store.load_github_settings().await?;
                if let Some(token) = token {
                    github.token = token.clone();
                }
                if let Some(base_url) = base_url {
                    github.base_url = base_url.clone();
                }
                if let Some(organization) = organization {
                    github.organization = organization.clone();
                }
                if let Some(repository) = repository {
                    github.repository = repository.clone();
                }
                store.save_github_settings(&github).await?;
                println!("✅ Settings saved");
            }
            SettingsCommand::ListMembers => {
                for member in store.load_github_settings().await?.tracked_members {
                    println!("👤 {member}");
                }
            }
            SettingsCommand::AddMember(handle) => {
                if store.add_member(handle).await? {
                    println!("✅ Now tracking {handle}");
                } else {
                    println!("ℹ️  {handle} is already tracked");
                }
            }
            SettingsCommand::RemoveMember(handle) => {
                if store.remove_member(handle).await? {
                    println!("✅ Stopped tracking {handle}");
                } else {
                    println!("ℹ️  {handle} was not tracked");
                }
            }
            SettingsCommand::ListWorkflows => {
                for wf in store.load_workflow_settings().await?.workflow_ids {
                    println!("🏗️  {} - {} (page size {})", wf.id, wf.display_name, wf.page_size);
                }
            }
            SettingsCommand::AddWorkflow(workflow) => {
                if store.add_workflow(workflow.clone()).await? {
                    println!("✅ Tracking workflow {}", workflow.id);
                } else {
                    println!("ℹ️  Workflow {} is already tracked", workflow.id);
                }
            }
            SettingsCommand::UpdateWorkflow { id, name, page_size } => {
                let current = store
                    .load_workflow_settings()
                    .await?
                    .workflow_ids
                    .into_iter()
                    .find(|wf| &wf.id == id);
                let Some(mut workflow) = current else {
                    println!("ℹ️  Workflow {id} is not tracked");
                    return Ok(());
                };
                if let Some(name) = name {
                    workflow.display_name = name.clone();
                }
                if let Some(page_size) = page_size {
                    workflow.page_size = *page_size;
                }
                store.update_workflow(workflow).await?;
                println!("✅ Workflow {id} updated");
            }
            SettingsCommand::RemoveWorkflow(id) => {
                if store.delete_workflow(id).await? {
                    println!("✅ Workflow {id} removed");
                } else {
                    println!("ℹ️  Workflow {id} is not tracked");
                }
            }
        }
        Ok(())
    }
}
