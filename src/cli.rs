use crate::store::SortMode;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Sleeper league utilities for the H2H history store.
#[derive(Parser)]
#[command(name = "h2h", version, about = "Sleeper league H2H utilities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch weekly matchups from Sleeper and append new games to the store.
    Update(UpdateArgs),
    /// Normalize legacy Saunders round labels across seasons.
    MigrateRounds(MigrateArgs),
    /// Print transaction churn tables: most owners, pickups, and drops.
    Churn(ChurnArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Sleeper league id.
    #[arg(long)]
    pub league: String,

    /// Season being updated.
    #[arg(long, default_value_t = 2025)]
    pub season: i32,

    /// Path to the existing H2H store.
    #[arg(long = "h2h")]
    pub h2h: PathBuf,

    /// Path to write the updated store.
    #[arg(long)]
    pub out: PathBuf,

    /// roster_id → canonical team name mapping JSON. Required unless
    /// --list-teams.
    #[arg(long = "map")]
    pub map: Option<PathBuf>,

    /// Only print the league's teams (and a mapping skeleton) and exit.
    #[arg(long)]
    pub list_teams: bool,

    /// Weeks to fetch: single weeks and inclusive ranges, comma-separated
    /// (e.g. "1-14" or "15-17" or "1,3,5-7").
    #[arg(long, default_value = "1-14")]
    pub weeks: WeekSelection,

    /// Include only games that have happened (by week Sunday) and are not
    /// 0-0.
    #[arg(long)]
    pub only_played: bool,

    /// Optional YYYY-MM-DD cutoff for --only-played (default: today).
    #[arg(long)]
    pub cutoff_date: Option<NaiveDate>,

    /// Hard cap for weeks.
    #[arg(long, default_value_t = 17)]
    pub max_week: u32,

    /// Last week of the regular season.
    #[arg(long, default_value_t = 14)]
    pub regular_season_max_week: u32,

    /// Fetch weeks beyond the regular season and classify them via the
    /// bracket endpoints.
    #[arg(long)]
    pub allow_postseason: bool,

    /// How to order the store on write.
    #[arg(long, value_enum, default_value = "season")]
    pub sort_mode: SortMode,

    /// Week-1 Sunday for the season, for seasons without a built-in anchor.
    #[arg(long)]
    pub week1_date: Option<NaiveDate>,

    /// Allow --out to overwrite the input store.
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Input H2H store.
    #[arg(long)]
    pub input: PathBuf,

    /// Output H2H store.
    #[arg(long)]
    pub output: PathBuf,

    /// Season when the Saunders bracket moved to 6 teams.
    #[arg(long, default_value_t = 2025)]
    pub six_team_start: i32,

    /// Allow overwriting the input path.
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Args, Debug)]
pub struct ChurnArgs {
    /// Sleeper league id.
    #[arg(long)]
    pub league: String,

    /// Sport key for the state and players endpoints.
    #[arg(long, default_value = "nfl")]
    pub sport: String,

    /// Rows per table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Comma-separated week tokens: `N` or inclusive `A-B`. De-duplicated and
/// sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSelection(pub Vec<u32>);

impl FromStr for WeekSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weeks = BTreeSet::new();
        for token in s.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if let Some((a, b)) = token.split_once('-') {
                let start: u32 = a
                    .trim()
                    .parse()
                    .map_err(|_| format!("bad week range start in {token:?}"))?;
                let end: u32 = b
                    .trim()
                    .parse()
                    .map_err(|_| format!("bad week range end in {token:?}"))?;
                if start > end {
                    return Err(format!("week range {token:?} runs backwards"));
                }
                weeks.extend(start..=end);
            } else {
                weeks.insert(
                    token
                        .parse()
                        .map_err(|_| format!("bad week number {token:?}"))?,
                );
            }
        }
        Ok(WeekSelection(weeks.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_selection_parses_singles_ranges_and_mixes() {
        assert_eq!("1-14".parse(), Ok(WeekSelection((1..=14).collect())));
        assert_eq!("15".parse(), Ok(WeekSelection(vec![15])));
        assert_eq!(
            " 1, 3 ,5-7 ,".parse(),
            Ok(WeekSelection(vec![1, 3, 5, 6, 7]))
        );
    }

    #[test]
    fn week_selection_dedups_and_sorts() {
        assert_eq!("5,1-3,2".parse(), Ok(WeekSelection(vec![1, 2, 3, 5])));
    }

    #[test]
    fn week_selection_rejects_garbage() {
        assert!("abc".parse::<WeekSelection>().is_err());
        assert!("9-3".parse::<WeekSelection>().is_err());
        assert!("1-x".parse::<WeekSelection>().is_err());
    }

    #[test]
    fn cli_parses_an_update_invocation() {
        let cli = Cli::try_parse_from([
            "h2h",
            "update",
            "--league",
            "123",
            "--h2h",
            "H2H.json",
            "--out",
            "H2H.updated.json",
            "--map",
            "mapping.json",
            "--weeks",
            "15-17",
            "--only-played",
            "--allow-postseason",
            "--sort-mode",
            "global",
        ])
        .expect("valid args");
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.weeks.0, vec![15, 16, 17]);
        assert!(args.only_played);
        assert!(args.allow_postseason);
        assert_eq!(args.sort_mode, SortMode::Global);
        assert_eq!(args.season, 2025);
    }
}
