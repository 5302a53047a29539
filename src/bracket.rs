//! Postseason classification: which roster pairs belong to the winners
//! (championship) bracket, which to the losers ("Saunders") bracket, and
//! what the round for a given week is called.
//!
//! Sleeper reuses the integer in a bracket row's `m` field across the two
//! brackets, so matchup ids can't key the classification. We key by the
//! normalized (min, max) roster-id pair instead and match weekly matchups
//! against those pairs.

use crate::store::GameKind;
use sleeper_api::BracketSlot;
use std::collections::HashSet;

pub type RosterPair = (u32, u32);

/// Normalize two roster ids into (min, max) order.
pub fn normalize_pair(a: u32, b: u32) -> RosterPair {
    if a < b { (a, b) } else { (b, a) }
}

/// The two bracket pair sets for one season's postseason.
#[derive(Debug, Clone, Default)]
pub struct BracketPairs {
    pub playoff: HashSet<RosterPair>,
    pub saunders: HashSet<RosterPair>,
}

impl BracketPairs {
    /// Build the pair sets from the winners and losers bracket rows.
    ///
    /// Rows with a positive placement value (5th place game and friends) and
    /// rows with a missing side (unplayed placeholder slots) are skipped —
    /// best effort, since mid-postseason brackets are routinely incomplete.
    pub fn from_rows(winners: &[BracketSlot], losers: &[BracketSlot]) -> Self {
        Self {
            playoff: ingest(winners),
            saunders: ingest(losers),
        }
    }

    /// Classify a weekly matchup by its roster pair.
    ///
    /// Nothing stops malformed upstream data from listing a pair in both
    /// brackets; we don't dedup across the sets, and the winners bracket
    /// wins by check order. `None` means a placement game (or a matchup the
    /// brackets know nothing about) — callers drop and count those.
    pub fn classify(&self, roster_a: u32, roster_b: u32) -> Option<GameKind> {
        let pair = normalize_pair(roster_a, roster_b);
        if self.playoff.contains(&pair) {
            Some(GameKind::Playoff)
        } else if self.saunders.contains(&pair) {
            Some(GameKind::Saunders)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.playoff.is_empty() && self.saunders.is_empty()
    }
}

fn ingest(rows: &[BracketSlot]) -> HashSet<RosterPair> {
    rows.iter()
        .filter(|row| !matches!(row.placement, Some(p) if p > 0))
        .filter_map(|row| Some(normalize_pair(row.team_one?, row.team_two?)))
        .collect()
}

/// The league's fixed week → round mapping: week 15 is the Wild Card round,
/// 16 the Semi Finals, 17 the Championship (Saunders Final on the losers
/// side). Anything else has no label and the game can't be classified.
pub fn round_label(week: u32, kind: GameKind) -> Option<&'static str> {
    match (kind, week) {
        (GameKind::Playoff, 15) => Some("Wild Card"),
        (GameKind::Playoff, 16) => Some("Semi Final"),
        (GameKind::Playoff, 17) => Some("Championship"),
        (GameKind::Saunders, 15) => Some("Saunders Wild Card"),
        (GameKind::Saunders, 16) => Some("Saunders Semi Final"),
        (GameKind::Saunders, 17) => Some("Saunders Final"),
        _ => None,
    }
}
