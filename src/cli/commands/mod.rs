use crate::config::DashboardConfig;
use crate::github::GitHubApi;
use crate::http::RateLimitedHttpClient;
use crate::settings::{FileStorage, GitHubSettings, SettingsStore};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

pub mod builds;
pub mod extract;
pub mod init_config;
pub mod settings;
pub mod team;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Configuration and settings shared by every command
pub struct CommandContext {
    pub config: DashboardConfig,
    pub store: SettingsStore,
}

impl CommandContext {
    pub fn new(config: DashboardConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.storage.settings_dir.clone()));
        Self {
            config,
            store: SettingsStore::new(storage),
        }
    }

    pub fn with_store(config: DashboardConfig, store: SettingsStore) -> Self {
        Self { config, store }
    }

    /// Stored connection settings, with the configured token as fallback
    pub async fn github_settings(&self) -> Result<GitHubSettings> {
        let mut settings = self
            .store
            .load_github_settings()
            .await
            .context("Failed to load GitHub settings")?;
        if settings.token.trim().is_empty() {
            if let Some(token) = &self.config.github.token {
                settings.token = token.clone();
            }
        }
        Ok(settings)
    }

    pub fn client(&self, settings: &GitHubSettings) -> Result<Arc<dyn GitHubApi>> {
        let client = RateLimitedHttpClient::from_settings(
            settings,
            &self.config.github.base_url,
            &self.config.http,
        )?;
        Ok(Arc::new(client))
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("📈 team-pulse - Team activity and builds from GitHub");
    println!();
    println!("To get started:");
    println!("  🔑 team-pulse settings set --organization <org> --repository <repo|*> --token <token>");
    println!("  👥 team-pulse settings members add <handle>");
    println!("  ⚙️  team-pulse settings workflows add <workflow-id> --name <name>");
    println!();
    println!("Then:");
    println!("  📊 team-pulse team          # Per-member activity");
    println!("  🏆 team-pulse leaderboard   # Ranked summary");
    println!("  🏗️  team-pulse builds        # Workflow runs with PR references");
    println!("  📦 team-pulse jobs <run-id> # Published releases of a run");
    println!();
    println!("💡 Every data command accepts --json");
    Ok(())
}
