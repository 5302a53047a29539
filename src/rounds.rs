//! Historical Saunders round-label normalization.
//!
//! The Saunders bracket grew from 4 to 6 teams. Before the change its first
//! round was the semi-final; from the 6-team season on, round 1 is a wild
//! card and round 2 the semi-final. Stored labels predate this and get
//! renamed in place. Rerunning the pass is a no-op once labels are renamed,
//! since it matches on the legacy strings only.

use crate::store::{GameKind, GameRecord, RecordStore};
use tracing::debug;

/// Rename a legacy Saunders round label on one record. Returns whether the
/// record changed.
pub fn normalize_round(game: &mut GameRecord, six_team_start: i32) -> bool {
    if game.kind != GameKind::Saunders {
        return false;
    }
    let Some(round) = game.round.as_deref() else {
        return false;
    };

    let renamed = if game.season < six_team_start {
        match round.trim() {
            "Saunders Round 1" => Some("Saunders Semi Final"),
            _ => None,
        }
    } else {
        match round.trim() {
            "Saunders Round 1" => Some("Saunders Wild Card"),
            "Saunders Round 2" => Some("Saunders Semi Final"),
            _ => None,
        }
    };

    match renamed {
        Some(label) => {
            game.round = Some(label.to_owned());
            true
        }
        None => false,
    }
}

/// Apply [`normalize_round`] across the store. Raw rows pass through
/// untouched. Returns the number of records changed.
pub fn normalize_store(store: &mut RecordStore, six_team_start: i32) -> usize {
    let mut changed = 0;
    for game in store.games_mut() {
        if normalize_round(game, six_team_start) {
            debug!(
                season = game.season,
                round = game.round.as_deref().unwrap_or(""),
                "renamed legacy Saunders round"
            );
            changed += 1;
        }
    }
    changed
}
