/// Wire types for the Sleeper fantasy-football API.
/// Base: https://api.sleeper.app/v1
use serde::Deserialize;
use std::collections::HashMap;

/// `GET /league/{id}/users`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct UserMetadata {
    pub team_name: Option<String>,
}

/// `GET /league/{id}/rosters`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperRoster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<RosterMetadata>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct RosterMetadata {
    pub team_name: Option<String>,
}

/// `GET /league/{id}/matchups/{week}`
///
/// Two rows share a `matchup_id` per head-to-head game. Rows with a null
/// `matchup_id` are byes / unscheduled slots.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperMatchup {
    pub matchup_id: Option<u64>,
    pub roster_id: u32,
    #[serde(default)]
    pub points: Option<f64>,
}

/// `GET /league/{id}/winners_bracket` and `/losers_bracket`
///
/// `t1`/`t2` are null for placeholder slots (winner-of-game refs carried in
/// `t1_from`/`t2_from`, which we never need). `p` marks placement games:
/// a positive value means the row only ranks already-eliminated teams.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperBracketRow {
    pub t1: Option<u32>,
    pub t2: Option<u32>,
    pub p: Option<i64>,
    pub m: Option<u64>,
    pub r: Option<u32>,
    pub w: Option<u32>,
    pub l: Option<u32>,
}

/// `GET /league/{id}/transactions/{week}`
///
/// `adds` and `drops` map player id (string) to roster id.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperTransaction {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub adds: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub drops: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub created: i64,
}

/// `GET /state/{sport}`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperState {
    pub leg: Option<u32>,
    pub week: Option<u32>,
    pub season: Option<String>,
}

/// `GET /league/{id}/drafts`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperDraft {
    pub draft_id: String,
}

/// `GET /draft/{draft_id}/picks`
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperDraftPick {
    pub player_id: Option<String>,
    pub roster_id: Option<u32>,
}

/// One entry of the `GET /players/{sport}` directory.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct SleeperPlayer {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
