use super::{print_json, Command, CommandContext};
use crate::github::DateFilter;
use crate::team::{generate_leaderboard_data, rank_by, LeaderboardMetric, TeamAggregator, TeamMember};
use anyhow::Result;

pub struct TeamCommand {
    pub since: DateFilter,
    pub json: bool,
}

pub struct LeaderboardCommand {
    pub since: DateFilter,
    pub sort: LeaderboardMetric,
    pub json: bool,
}

async fn load_team(ctx: &CommandContext, since: DateFilter, quiet: bool) -> Result<Vec<TeamMember>> {
    let settings = ctx.github_settings().await?;
    let aggregator = TeamAggregator::from_settings(ctx.client(&settings)?, &settings)?
        .with_result_limit(ctx.config.github.result_limit)
        .with_max_concurrency(ctx.config.http.max_concurrency);

    if !quiet {
        print!("🔄 Gathering team activity from GitHub... ");
        std::io::Write::flush(&mut std::io::stdout())?;
    }
    let team = aggregator.fetch_team_data(since).await?;
    if !quiet {
        println!("✅");
        println!();
    }
    crate::observability::github_metrics().log_stats();
    Ok(team)
}

impl Command for TeamCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let team = load_team(ctx, self.since, self.json).await?;
        if self.json {
            return print_json(&team);
        }

        println!("👥 TEAM ACTIVITY");
        println!("================");
        for member in &team {
            println!();
            println!("👤 {}", member.handle);
            println!("   📋 PRs: {}", member.prs.len());
            println!("   💬 Comments given: {}", member.comments_given);
            println!("   📨 Comments received: {}", member.comments_received);
            println!("   ✅ Approvals given: {}", member.approvals_given);
            match member.average_review_time_hours {
                Some(hours) => println!("   ⏱️  Average review time: {hours}h"),
                None => println!("   ⏱️  Average review time: n/a"),
            }
            if let Some(date) = member.last_approval_date {
                println!("   📅 Last approval: {}", date.format("%Y-%m-%d %H:%M"));
            }
            for pr in &member.prs {
                println!(
                    "      #{} [{}] {} ({} approvals, {} comments)",
                    pr.number, pr.status, pr.title, pr.approval_count, pr.comment_count
                );
            }
        }
        Ok(())
    }
}

impl Command for LeaderboardCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let team = load_team(ctx, self.since, self.json).await?;
        let mut entries = generate_leaderboard_data(&team);
        rank_by(&mut entries, self.sort);

        if self.json {
            return print_json(&entries);
        }

        println!("🏆 LEADERBOARD");
        println!("==============");
        println!(
            "{:<4} {:<20} {:>5} {:>9} {:>9} {:>9} {:>8}",
            "#", "handle", "PRs", "comments", "approvals", "received", "review"
        );
        for (rank, entry) in entries.iter().enumerate() {
            let review = entry
                .average_review_time_hours
                .map(|hours| format!("{hours}h"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<4} {:<20} {:>5} {:>9} {:>9} {:>9} {:>8}",
                rank + 1,
                entry.handle,
                entry.total_prs,
                entry.total_comments_given,
                entry.total_approvals_given,
                entry.comments_received,
                review
            );
        }
        Ok(())
    }
}
