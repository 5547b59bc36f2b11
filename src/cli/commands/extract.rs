use super::{print_json, Command, CommandContext};
use crate::extract::{extract_from_archive, extract_pr_references, extract_release_info};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

pub enum ExtractCommand {
    Releases { file: PathBuf, json: bool },
    Notes { file: PathBuf, json: bool },
    Archive { file: PathBuf, json: bool },
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        return Ok(buf);
    }
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn read_text(path: &Path) -> Result<String> {
    Ok(String::from_utf8_lossy(&read_input(path).await?).into_owned())
}

impl Command for ExtractCommand {
    async fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        match self {
            ExtractCommand::Releases { file, json } => {
                let releases = extract_release_info(&read_text(file).await?);
                if *json {
                    return print_json(&releases);
                }
                if releases.is_empty() {
                    println!("📭 No upload lines found");
                }
                for release in &releases {
                    println!("🚀 {} {} ({})", release.platform, release.version, release.build_number);
                }
            }
            ExtractCommand::Notes { file, json } => {
                let prs = extract_pr_references(&read_text(file).await?);
                if *json {
                    return print_json(&prs);
                }
                if prs.is_empty() {
                    println!("📭 No PR references found");
                }
                for pr in &prs {
                    println!("🔗 #{} {}", pr.number, pr.title);
                }
            }
            ExtractCommand::Archive { file, json } => {
                let data = extract_from_archive(&read_input(file).await?)
                    .with_context(|| format!("Failed to read artifact {}", file.display()))?;
                if *json {
                    return print_json(&data);
                }
                println!("📦 PRs: {}", if data.prs.is_empty() { "-" } else { data.prs.as_str() });
                for pr in &data.pr_details {
                    println!("   🔗 #{} {}", pr.number, pr.title);
                }
            }
        }
        Ok(())
    }
}
