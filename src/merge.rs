//! Dedup & merge: fold freshly fetched weekly matchups into the record
//! store without inserting games the store already has.

use crate::bracket::{BracketPairs, round_label};
use crate::schedule::WeekCalendar;
use crate::store::{GameKey, GameKind, GameRecord, RecordStore};
use anyhow::Context;
use chrono::NaiveDate;
use sleeper_api::MatchupSlot;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub season: i32,
    pub regular_season_max_week: u32,
    pub allow_postseason: bool,
    /// Skip weeks dated after the cutoff and games still at 0.00–0.00.
    pub only_played: bool,
    pub cutoff: NaiveDate,
}

/// One fetched week's worth of matchup slots.
#[derive(Debug, Clone)]
pub struct WeekMatchups {
    pub week: u32,
    pub slots: Vec<MatchupSlot>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub appended: usize,
    pub skipped_unclassified: usize,
    pub skipped_placement: usize,
    pub fetched_weeks: Vec<u32>,
}

/// Which requested weeks to actually fetch, after the hard cap and the
/// regular-season cap. The dropped lists are reported, not fatal.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WeekPlan {
    pub weeks: Vec<u32>,
    pub beyond_max: Vec<u32>,
    pub beyond_regular: Vec<u32>,
}

pub fn plan_weeks(
    requested: &[u32],
    max_week: u32,
    regular_season_max_week: u32,
    allow_postseason: bool,
) -> WeekPlan {
    let (capped, beyond_max): (Vec<u32>, Vec<u32>) =
        requested.iter().copied().partition(|&w| w <= max_week);
    if allow_postseason {
        return WeekPlan {
            weeks: capped,
            beyond_max,
            beyond_regular: Vec::new(),
        };
    }
    let (weeks, beyond_regular) = capped
        .iter()
        .copied()
        .partition(|&w| w <= regular_season_max_week);
    WeekPlan {
        weeks,
        beyond_max,
        beyond_regular,
    }
}

/// Group weekly slots into head-to-head pairs by matchup id. Slots without
/// one (byes) and groups that aren't exactly two slots are dropped.
pub fn pair_matchups(slots: &[MatchupSlot]) -> Vec<(&MatchupSlot, &MatchupSlot)> {
    let mut by_id: BTreeMap<u64, Vec<&MatchupSlot>> = BTreeMap::new();
    for slot in slots {
        if let Some(id) = slot.matchup_id {
            by_id.entry(id).or_default().push(slot);
        }
    }
    by_id
        .into_values()
        .filter_map(|group| match group.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        })
        .collect()
}

/// Scores are stored to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Fold fetched weeks into the store. The caller has already validated that
/// every roster id has a canonical name; an unknown id here is a bug, not
/// operator error, and aborts.
pub fn merge_weeks(
    store: &mut RecordStore,
    weeks: &[WeekMatchups],
    names: &HashMap<u32, String>,
    bracket: &BracketPairs,
    calendar: &WeekCalendar,
    cfg: &MergeConfig,
) -> anyhow::Result<MergeOutcome> {
    let mut existing = store.existing_keys();
    let mut outcome = MergeOutcome::default();

    for week_data in weeks {
        let week = week_data.week;
        let pairs = pair_matchups(&week_data.slots);
        if pairs.is_empty() {
            continue;
        }
        outcome.fetched_weeks.push(week);

        let game_date = calendar.sunday_for_week(cfg.season, week)?;
        if cfg.only_played && game_date > cfg.cutoff {
            debug!(week, %game_date, cutoff = %cfg.cutoff, "week after cutoff, skipping");
            continue;
        }

        for (a, b) in pairs {
            let name_of = |rid: u32| -> anyhow::Result<&String> {
                names
                    .get(&rid)
                    .with_context(|| format!("no canonical name for roster {rid}"))
            };
            let team_a = name_of(a.roster_id)?.clone();
            let team_b = name_of(b.roster_id)?.clone();

            let score_a = round2(a.points);
            let score_b = round2(b.points);
            if cfg.only_played && score_a == 0.0 && score_b == 0.0 {
                continue;
            }

            let key = GameKey::new(i64::from(cfg.season), u64::from(week), &team_a, &team_b);
            if existing.contains(&key) {
                continue;
            }

            let mut kind = GameKind::Regular;
            let mut round = None;

            if week > cfg.regular_season_max_week {
                if !cfg.allow_postseason {
                    continue;
                }
                match bracket.classify(a.roster_id, b.roster_id) {
                    Some(classified) => kind = classified,
                    None => {
                        // Placement game (5-6, 7-8) or a pair the brackets
                        // know nothing about.
                        outcome.skipped_unclassified += 1;
                        continue;
                    }
                }
                match round_label(week, kind) {
                    Some(label) => round = Some(label.to_owned()),
                    None => {
                        warn!(week, ?kind, "classified matchup has no round label, skipping");
                        outcome.skipped_placement += 1;
                        continue;
                    }
                }
            }

            store.push(GameRecord {
                season: cfg.season,
                date: game_date,
                team_a,
                team_b,
                score_a,
                score_b,
                week: Some(week),
                round,
                kind,
                extra: serde_json::Map::new(),
            });
            existing.insert(key);
            outcome.appended += 1;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreEntry;
    use sleeper_api::BracketSlot;

    fn slot(matchup_id: u64, roster_id: u32, points: f64) -> MatchupSlot {
        MatchupSlot {
            matchup_id: Some(matchup_id),
            roster_id,
            points,
        }
    }

    fn names() -> HashMap<u32, String> {
        (1..=8).map(|rid| (rid, format!("Team {rid}"))).collect()
    }

    fn config(week_cap: u32) -> MergeConfig {
        MergeConfig {
            season: 2025,
            regular_season_max_week: week_cap,
            allow_postseason: false,
            only_played: false,
            cutoff: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        }
    }

    fn week(week: u32, slots: Vec<MatchupSlot>) -> WeekMatchups {
        WeekMatchups { week, slots }
    }

    #[test]
    fn pairing_drops_byes_and_odd_groups() {
        let slots = vec![
            slot(1, 1, 100.0),
            slot(1, 2, 90.0),
            slot(2, 3, 80.0), // partner missing
            MatchupSlot {
                matchup_id: None,
                roster_id: 4,
                points: 70.0,
            },
        ];
        let pairs = pair_matchups(&slots);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].0.roster_id, pairs[0].1.roster_id), (1, 2));
    }

    #[test]
    fn merge_appends_regular_season_games() {
        let mut store = RecordStore::default();
        let outcome = merge_weeks(
            &mut store,
            &[week(1, vec![slot(1, 1, 101.456), slot(1, 2, 99.0)])],
            &names(),
            &BracketPairs::default(),
            &WeekCalendar::default(),
            &config(14),
        )
        .unwrap();
        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.fetched_weeks, vec![1]);
        let game = store.entries()[0].as_game().unwrap();
        assert_eq!(game.score_a, 101.46);
        assert_eq!(game.round, None);
        assert_eq!(game.kind, GameKind::Regular);
        assert_eq!(game.date, NaiveDate::from_ymd_opt(2025, 9, 7).unwrap());
    }

    #[test]
    fn duplicate_key_never_grows_the_store() {
        let mut store = RecordStore::default();
        let weeks = [week(3, vec![slot(1, 1, 100.0), slot(1, 2, 90.0)])];
        let cal = WeekCalendar::default();
        let first = merge_weeks(
            &mut store,
            &weeks,
            &names(),
            &BracketPairs::default(),
            &cal,
            &config(14),
        )
        .unwrap();
        assert_eq!(first.appended, 1);
        let len_after_first = store.len();

        // Same game again, teams reported in the other order.
        let again = [week(3, vec![slot(1, 2, 90.0), slot(1, 1, 100.0)])];
        let second = merge_weeks(
            &mut store,
            &again,
            &names(),
            &BracketPairs::default(),
            &cal,
            &config(14),
        )
        .unwrap();
        assert_eq!(second.appended, 0);
        assert_eq!(store.len(), len_after_first);
    }

    #[test]
    fn dedup_also_sees_raw_store_rows() {
        let mut store = RecordStore::from_entries(vec![StoreEntry::Raw(serde_json::json!({
            "season": 2025, "week": 3, "teamA": "Team 2", "teamB": "Team 1"
        }))]);
        let outcome = merge_weeks(
            &mut store,
            &[week(3, vec![slot(1, 1, 100.0), slot(1, 2, 90.0)])],
            &names(),
            &BracketPairs::default(),
            &WeekCalendar::default(),
            &config(14),
        )
        .unwrap();
        assert_eq!(outcome.appended, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn only_played_skips_future_weeks_regardless_of_score() {
        let mut store = RecordStore::default();
        let mut cfg = config(14);
        cfg.only_played = true;
        cfg.cutoff = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let outcome = merge_weeks(
            &mut store,
            &[
                week(1, vec![slot(1, 1, 100.0), slot(1, 2, 90.0)]),
                week(2, vec![slot(1, 3, 120.0), slot(1, 4, 80.0)]), // 2025-09-14 > cutoff
            ],
            &names(),
            &BracketPairs::default(),
            &WeekCalendar::default(),
            &cfg,
        )
        .unwrap();
        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.fetched_weeks, vec![1, 2]);
    }

    #[test]
    fn only_played_skips_zero_zero_games() {
        let mut store = RecordStore::default();
        let mut cfg = config(14);
        cfg.only_played = true;
        let outcome = merge_weeks(
            &mut store,
            &[week(1, vec![slot(1, 1, 0.0), slot(1, 2, 0.0)])],
            &names(),
            &BracketPairs::default(),
            &WeekCalendar::default(),
            &cfg,
        )
        .unwrap();
        assert_eq!(outcome.appended, 0);
    }

    #[test]
    fn postseason_weeks_need_the_allow_flag() {
        let mut store = RecordStore::default();
        let outcome = merge_weeks(
            &mut store,
            &[week(15, vec![slot(1, 1, 100.0), slot(1, 2, 90.0)])],
            &names(),
            &BracketPairs::default(),
            &WeekCalendar::default(),
            &config(14),
        )
        .unwrap();
        assert_eq!(outcome.appended, 0);
    }

    #[test]
    fn postseason_games_are_classified_and_labeled() {
        let bracket = BracketPairs::from_rows(
            &[BracketSlot {
                team_one: Some(1),
                team_two: Some(2),
                placement: None,
            }],
            &[BracketSlot {
                team_one: Some(5),
                team_two: Some(6),
                placement: None,
            }],
        );
        let mut store = RecordStore::default();
        let mut cfg = config(14);
        cfg.allow_postseason = true;
        let outcome = merge_weeks(
            &mut store,
            &[week(
                15,
                vec![
                    slot(1, 1, 110.0),
                    slot(1, 2, 100.0),
                    slot(2, 5, 95.0),
                    slot(2, 6, 85.0),
                    slot(3, 7, 60.0), // placement game, in neither bracket
                    slot(3, 8, 55.0),
                ],
            )],
            &names(),
            &bracket,
            &WeekCalendar::default(),
            &cfg,
        )
        .unwrap();
        assert_eq!(outcome.appended, 2);
        assert_eq!(outcome.skipped_unclassified, 1);

        let games: Vec<&GameRecord> = store
            .entries()
            .iter()
            .filter_map(StoreEntry::as_game)
            .collect();
        assert_eq!(games[0].kind, GameKind::Playoff);
        assert_eq!(games[0].round.as_deref(), Some("Wild Card"));
        assert_eq!(games[1].kind, GameKind::Saunders);
        assert_eq!(games[1].round.as_deref(), Some("Saunders Wild Card"));
    }

    #[test]
    fn classified_week_outside_label_table_counts_as_placement_skip() {
        let bracket = BracketPairs::from_rows(
            &[BracketSlot {
                team_one: Some(1),
                team_two: Some(2),
                placement: None,
            }],
            &[],
        );
        let mut store = RecordStore::default();
        let mut cfg = config(14);
        cfg.allow_postseason = true;
        cfg.regular_season_max_week = 13; // week 14 is postseason but unlabeled
        let outcome = merge_weeks(
            &mut store,
            &[week(14, vec![slot(1, 1, 100.0), slot(1, 2, 90.0)])],
            &names(),
            &bracket,
            &WeekCalendar::default(),
            &cfg,
        )
        .unwrap();
        assert_eq!(outcome.appended, 0);
        assert_eq!(outcome.skipped_placement, 1);
    }

    #[test]
    fn week_plan_respects_both_caps() {
        let requested = [12, 13, 14, 15, 16, 17, 18];
        let plan = plan_weeks(&requested, 17, 14, false);
        assert_eq!(plan.weeks, vec![12, 13, 14]);
        assert_eq!(plan.beyond_max, vec![18]);
        assert_eq!(plan.beyond_regular, vec![15, 16, 17]);

        let plan = plan_weeks(&requested, 17, 14, true);
        assert_eq!(plan.weeks, vec![12, 13, 14, 15, 16, 17]);
        assert_eq!(plan.beyond_max, vec![18]);
        assert!(plan.beyond_regular.is_empty());
    }

    #[test]
    fn round2_behaves_like_score_formatting() {
        assert_eq!(round2(101.456), 101.46);
        assert_eq!(round2(99.0), 99.0);
        assert_eq!(round2(0.005), 0.01);
    }
}
