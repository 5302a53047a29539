pub mod client;
pub mod sleeper;

pub use client::{ApiError, ApiResult, SleeperApi};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Sleeper wire format
// ---------------------------------------------------------------------------

/// One league team: the users/rosters join, keyed by roster id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamEntry {
    pub roster_id: u32,
    pub owner_user_id: Option<String>,
    pub display_name: String,
    pub username: String,
    pub sleeper_team_name: String,
}

impl TeamEntry {
    /// Display label for report output: custom team name, then owner
    /// display name, then a `roster:{id}` placeholder.
    pub fn label(&self) -> String {
        let team_name = self.sleeper_team_name.trim();
        if !team_name.is_empty() {
            return team_name.to_owned();
        }
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        format!("roster:{}", self.roster_id)
    }
}

/// One side of a weekly head-to-head matchup. Two slots share a
/// `matchup_id`; slots without one are byes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupSlot {
    pub matchup_id: Option<u64>,
    pub roster_id: u32,
    pub points: f64,
}

/// One bracket row. `placement > 0` marks a placement game (5th place game
/// and the like); a missing side is an unplayed placeholder slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketSlot {
    pub team_one: Option<u32>,
    pub team_two: Option<u32>,
    pub placement: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionKind {
    Waiver,
    FreeAgent,
    Trade,
    #[default]
    Other,
}

impl TransactionKind {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "waiver" => TransactionKind::Waiver,
            "free_agent" => TransactionKind::FreeAgent,
            "trade" => TransactionKind::Trade,
            _ => TransactionKind::Other,
        }
    }

    /// Only waiver and free-agent moves count toward pickup/drop stats.
    pub fn counts_as_pickup(self) -> bool {
        matches!(self, TransactionKind::Waiver | TransactionKind::FreeAgent)
    }
}

/// One roster transaction. `adds`/`drops` pair player id with the roster
/// gaining or losing the player, sorted by player id for determinism.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub complete: bool,
    pub adds: Vec<(String, u32)>,
    pub drops: Vec<(String, u32)>,
    pub created: i64,
}

/// One draft selection: the drafting roster is a player's first owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPick {
    pub player_id: String,
    pub roster_id: u32,
}

/// Player id → display name lookup built from the full player directory.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    names: HashMap<String, String>,
}

impl PlayerDirectory {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Resolve a player id to a display name, falling back to the raw id.
    pub fn name(&self, player_id: &str) -> String {
        self.names
            .get(player_id)
            .cloned()
            .unwrap_or_else(|| player_id.to_owned())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
