use super::{Command, CommandContext};
use crate::config::DashboardConfig;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub struct InitConfigCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl Command for InitConfigCommand {
    async fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            );
        }
        DashboardConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote default configuration to {}", self.path.display());
        println!("💡 Environment overrides use TEAM_PULSE__<SECTION>__<KEY>, e.g. TEAM_PULSE__HTTP__MAX_CONCURRENCY=8");
        Ok(())
    }
}
