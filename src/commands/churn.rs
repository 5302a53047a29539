//! The transaction churn report: who has been owned by the most rosters,
//! picked up the most, dropped the most.

use crate::cli::ChurnArgs;
use crate::ownership::{OwnershipTracker, RankedPlayer};
use sleeper_api::SleeperApi;
use std::collections::HashMap;
use tracing::info;

pub async fn run(args: ChurnArgs) -> anyhow::Result<()> {
    let api = SleeperApi::new();

    let teams = api.list_teams(&args.league).await?;
    let labels: HashMap<u32, String> = teams.iter().map(|t| (t.roster_id, t.label())).collect();

    let mut tracker = OwnershipTracker::new();
    let picks = api.draft_picks(&args.league).await?;
    info!(picks = picks.len(), "seeded ownership from the draft");
    tracker.seed_draft(&picks);

    let final_week = api.current_week(&args.sport).await?;
    let mut transactions = Vec::new();
    for week in 1..=final_week {
        transactions.extend(api.transactions(&args.league, week).await?);
    }
    info!(
        count = transactions.len(),
        weeks = final_week,
        "collected transactions"
    );
    tracker.replay(transactions);

    let players = api.player_directory(&args.sport).await?;

    print_table(
        &format!("Top {}: Most different teams", args.top),
        "teams",
        &tracker.top_owners(args.top, &players),
        &labels,
    );
    print_table(
        &format!("Top {}: Most pickups (waiver/FA only)", args.top),
        "pickups",
        &tracker.top_pickups(args.top, &players),
        &labels,
    );
    print_table(
        &format!("Top {}: Most drops (waiver/FA only)", args.top),
        "drops",
        &tracker.top_drops(args.top, &players),
        &labels,
    );
    Ok(())
}

fn print_table(title: &str, unit: &str, rows: &[RankedPlayer], labels: &HashMap<u32, String>) {
    println!("\n== {title} ==");
    for row in rows {
        println!(
            "{} — {} {unit} ({})",
            row.name,
            row.count,
            chain_str(&row.chain, labels)
        );
    }
}

fn chain_str(chain: &[u32], labels: &HashMap<u32, String>) -> String {
    if chain.is_empty() {
        return "—".into();
    }
    chain
        .iter()
        .map(|rid| {
            labels
                .get(rid)
                .cloned()
                .unwrap_or_else(|| format!("roster:{rid}"))
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
