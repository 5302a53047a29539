//! The merge pipeline: fetch weekly matchups, classify postseason games via
//! the bracket endpoints, and append anything the store doesn't have yet.

use crate::bracket::BracketPairs;
use crate::cli::UpdateArgs;
use crate::mapping::TeamMapping;
use crate::merge::{self, MergeConfig, WeekMatchups};
use crate::schedule::WeekCalendar;
use crate::store::{self, RecordStore};
use anyhow::Context;
use chrono::Local;
use sleeper_api::SleeperApi;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub async fn run(args: UpdateArgs) -> anyhow::Result<()> {
    let api = SleeperApi::new();

    if args.list_teams {
        return list_teams(&api, &args.league).await;
    }

    let Some(map_path) = args.map.as_deref() else {
        eprintln!("Error: --map is required when appending data.");
        std::process::exit(2);
    };

    if let Err(e) = store::guard_overwrite(&args.h2h, &args.out, args.in_place) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let mut store = RecordStore::load(&args.h2h)?;
    let mapping = TeamMapping::load(map_path)?;

    let teams = api.list_teams(&args.league).await?;
    let names = match mapping.canonical_names(&teams) {
        Ok(names) => names,
        Err(missing) => {
            eprintln!("The following roster_ids are missing a canonical name in your mapping:");
            for m in &missing {
                eprintln!(
                    "  roster_id={}  display_name={}  username={}  sleeper_team_name={}",
                    m.roster_id, m.display_name, m.username, m.sleeper_team_name
                );
            }
            eprintln!("Please update your mapping JSON and re-run.");
            std::process::exit(3);
        }
    };

    let plan = merge::plan_weeks(
        &args.weeks.0,
        args.max_week,
        args.regular_season_max_week,
        args.allow_postseason,
    );
    if !plan.beyond_max.is_empty() {
        warn!(
            "skipping weeks beyond max-week (>{}): {:?}",
            args.max_week, plan.beyond_max
        );
    }
    if !plan.beyond_regular.is_empty() {
        warn!(
            "skipping weeks beyond regular season (>{}): {:?}",
            args.regular_season_max_week, plan.beyond_regular
        );
    }

    let bracket = if args.allow_postseason {
        let pairs = BracketPairs::from_rows(
            &api.winners_bracket(&args.league).await?,
            &api.losers_bracket(&args.league).await?,
        );
        info!(
            playoff = pairs.playoff.len(),
            saunders = pairs.saunders.len(),
            "postseason bracket pairs loaded"
        );
        pairs
    } else {
        BracketPairs::default()
    };

    let mut weeks = Vec::with_capacity(plan.weeks.len());
    for &week in &plan.weeks {
        let slots = api
            .matchups(&args.league, week)
            .await
            .with_context(|| format!("fetching matchups for week {week}"))?;
        weeks.push(WeekMatchups { week, slots });
    }

    let mut calendar = WeekCalendar::default();
    if let Some(anchor) = args.week1_date {
        calendar = calendar.with_anchor(args.season, anchor);
    }
    let cutoff = args
        .cutoff_date
        .unwrap_or_else(|| Local::now().date_naive());

    let cfg = MergeConfig {
        season: args.season,
        regular_season_max_week: args.regular_season_max_week,
        allow_postseason: args.allow_postseason,
        only_played: args.only_played,
        cutoff,
    };
    let outcome = merge::merge_weeks(&mut store, &weeks, &names, &bracket, &calendar, &cfg)?;

    store.sort(args.sort_mode, args.season);
    store.save(&args.out)?;

    println!(
        "Done. Appended {} new games. Wrote: {}. Sort mode: {:?}. Only-played: {}. \
         Cutoff: {}. Weeks fetched: {:?}. Skipped postseason-unclassified: {}.",
        outcome.appended,
        args.out.display(),
        args.sort_mode,
        args.only_played,
        args.cutoff_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "today".into()),
        outcome.fetched_weeks,
        outcome.skipped_unclassified,
    );
    Ok(())
}

/// Print the league's roster table plus a blank mapping skeleton to fill in.
async fn list_teams(api: &SleeperApi, league_id: &str) -> anyhow::Result<()> {
    let teams = api.list_teams(league_id).await?;
    println!("{}", serde_json::to_string_pretty(&teams)?);
    println!("\nTip: create a mapping JSON like:");
    let skeleton: BTreeMap<String, String> = teams
        .iter()
        .map(|t| (t.roster_id.to_string(), String::new()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&skeleton)?);
    Ok(())
}
