use crate::sleeper::{
    SleeperBracketRow, SleeperDraft, SleeperDraftPick, SleeperMatchup, SleeperPlayer,
    SleeperRoster, SleeperState, SleeperTransaction, SleeperUser,
};
use crate::{
    BracketSlot, DraftPick, MatchupSlot, PlayerDirectory, TeamEntry, Transaction, TransactionKind,
};
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SLEEPER_V1: &str = "https://api.sleeper.app/v1";

/// The state endpoint's `leg` field is missing during the offseason; the NFL
/// regular schedule tops out at 18 legs.
const DEFAULT_FINAL_WEEK: u32 = 18;

/// Sleeper API client.
#[derive(Debug, Clone)]
pub struct SleeperApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SleeperApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("h2h-tools/0.1 (league history updater)")
                .build()
                .unwrap_or_default(),
            base_url: SLEEPER_V1.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl SleeperApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different base URL (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch users and rosters for a league and join them into one team
    /// table, sorted by roster id.
    pub async fn list_teams(&self, league_id: &str) -> ApiResult<Vec<TeamEntry>> {
        let users: Vec<SleeperUser> = self
            .get(&format!("{}/league/{league_id}/users", self.base_url))
            .await?;
        let rosters: Vec<SleeperRoster> = self
            .get(&format!("{}/league/{league_id}/rosters", self.base_url))
            .await?;
        Ok(join_teams(users, rosters))
    }

    /// Fetch one week's head-to-head matchup slots.
    pub async fn matchups(&self, league_id: &str, week: u32) -> ApiResult<Vec<MatchupSlot>> {
        let raw: Vec<SleeperMatchup> = self
            .get(&format!(
                "{}/league/{league_id}/matchups/{week}",
                self.base_url
            ))
            .await?;
        Ok(raw.iter().map(map_matchup).collect())
    }

    /// Fetch the winners (championship) bracket rows.
    pub async fn winners_bracket(&self, league_id: &str) -> ApiResult<Vec<BracketSlot>> {
        let raw: Vec<SleeperBracketRow> = self
            .get(&format!(
                "{}/league/{league_id}/winners_bracket",
                self.base_url
            ))
            .await?;
        Ok(raw.iter().map(map_bracket_row).collect())
    }

    /// Fetch the losers (consolation) bracket rows.
    pub async fn losers_bracket(&self, league_id: &str) -> ApiResult<Vec<BracketSlot>> {
        let raw: Vec<SleeperBracketRow> = self
            .get(&format!(
                "{}/league/{league_id}/losers_bracket",
                self.base_url
            ))
            .await?;
        Ok(raw.iter().map(map_bracket_row).collect())
    }

    /// Fetch one week's transactions.
    pub async fn transactions(&self, league_id: &str, week: u32) -> ApiResult<Vec<Transaction>> {
        let raw: Vec<SleeperTransaction> = self
            .get(&format!(
                "{}/league/{league_id}/transactions/{week}",
                self.base_url
            ))
            .await?;
        Ok(raw.into_iter().map(map_transaction).collect())
    }

    /// Current week (`leg`) of the sport's schedule.
    pub async fn current_week(&self, sport: &str) -> ApiResult<u32> {
        let state: SleeperState = self
            .get(&format!("{}/state/{sport}", self.base_url))
            .await?;
        Ok(state.leg.unwrap_or(DEFAULT_FINAL_WEEK))
    }

    /// Picks of the league's most recent draft. A league with no draft
    /// (or an empty drafts list) yields no picks.
    pub async fn draft_picks(&self, league_id: &str) -> ApiResult<Vec<DraftPick>> {
        let drafts: Vec<SleeperDraft> = self
            .get(&format!("{}/league/{league_id}/drafts", self.base_url))
            .await?;
        let Some(draft) = drafts.into_iter().next() else {
            return Ok(Vec::new());
        };
        let raw: Vec<SleeperDraftPick> = self
            .get(&format!("{}/draft/{}/picks", self.base_url, draft.draft_id))
            .await?;
        Ok(raw.iter().filter_map(map_draft_pick).collect())
    }

    /// Full player directory, resolved to display names.
    pub async fn player_directory(&self, sport: &str) -> ApiResult<PlayerDirectory> {
        let raw: HashMap<String, SleeperPlayer> = self
            .get(&format!("{}/players/{sport}", self.base_url))
            .await?;
        let names = raw
            .into_iter()
            .filter_map(|(id, p)| resolve_player_name(&p).map(|n| (id, n)))
            .collect();
        Ok(PlayerDirectory::new(names))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: Sleeper wire types → clean domain types
// ---------------------------------------------------------------------------

/// Join the users and rosters responses into one row per roster.
///
/// Team name preference: roster metadata, then the owner's user metadata.
/// Display name preference: the owner's display name, then their username.
fn join_teams(users: Vec<SleeperUser>, rosters: Vec<SleeperRoster>) -> Vec<TeamEntry> {
    let users_by_id: HashMap<&str, &SleeperUser> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut teams: Vec<TeamEntry> = rosters
        .iter()
        .map(|r| {
            let user = r
                .owner_id
                .as_deref()
                .and_then(|id| users_by_id.get(id).copied());
            let display_name = user
                .and_then(|u| u.display_name.clone().or_else(|| u.username.clone()))
                .unwrap_or_default();
            let username = user.and_then(|u| u.username.clone()).unwrap_or_default();
            let sleeper_team_name = r
                .metadata
                .as_ref()
                .and_then(|m| m.team_name.clone())
                .or_else(|| {
                    user.and_then(|u| u.metadata.as_ref())
                        .and_then(|m| m.team_name.clone())
                })
                .unwrap_or_default();
            TeamEntry {
                roster_id: r.roster_id,
                owner_user_id: r.owner_id.clone(),
                display_name,
                username,
                sleeper_team_name,
            }
        })
        .collect();

    teams.sort_by_key(|t| t.roster_id);
    teams
}

fn map_matchup(m: &SleeperMatchup) -> MatchupSlot {
    MatchupSlot {
        matchup_id: m.matchup_id,
        roster_id: m.roster_id,
        points: m.points.unwrap_or(0.0),
    }
}

fn map_bracket_row(row: &SleeperBracketRow) -> BracketSlot {
    BracketSlot {
        team_one: row.t1,
        team_two: row.t2,
        placement: row.p,
    }
}

fn map_transaction(tx: SleeperTransaction) -> Transaction {
    let mut adds: Vec<(String, u32)> = tx.adds.unwrap_or_default().into_iter().collect();
    let mut drops: Vec<(String, u32)> = tx.drops.unwrap_or_default().into_iter().collect();
    adds.sort();
    drops.sort();
    Transaction {
        kind: tx
            .kind
            .as_deref()
            .map(TransactionKind::from_wire)
            .unwrap_or_default(),
        complete: tx.status.as_deref() == Some("complete"),
        adds,
        drops,
        created: tx.created,
    }
}

fn map_draft_pick(pick: &SleeperDraftPick) -> Option<DraftPick> {
    Some(DraftPick {
        player_id: pick.player_id.clone()?,
        roster_id: pick.roster_id?,
    })
}

fn resolve_player_name(p: &SleeperPlayer) -> Option<String> {
    if let Some(full) = p.full_name.as_deref()
        && !full.is_empty()
    {
        return Some(full.to_owned());
    }
    let first = p.first_name.as_deref().unwrap_or("");
    let last = p.last_name.as_deref().unwrap_or("");
    let joined = format!("{first} {last}").trim().to_owned();
    if joined.is_empty() { None } else { Some(joined) }
}
