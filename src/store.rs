//! The H2H record store: one JSON array of game records, read fully into
//! memory, merged against, and rewritten wholesale.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    Regular,
    Playoff,
    Saunders,
}

/// One completed or scheduled matchup, in the store's historical JSON shape.
///
/// Fields the store has accumulated beyond these (the site adds derived
/// ones) ride along in `extra` and are written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub season: i32,
    pub date: NaiveDate,
    #[serde(rename = "teamA")]
    pub team_a: String,
    #[serde(rename = "teamB")]
    pub team_b: String,
    #[serde(rename = "scoreA")]
    pub score_a: f64,
    #[serde(rename = "scoreB")]
    pub score_b: f64,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(rename = "type")]
    pub kind: GameKind,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Identity of a game within the store: (season, week, sorted team names).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey {
    pub season: i64,
    pub week: u64,
    pub team_low: String,
    pub team_high: String,
}

impl GameKey {
    pub fn new(season: i64, week: u64, team_a: &str, team_b: &str) -> Self {
        let (team_low, team_high) = if team_a <= team_b {
            (team_a.to_owned(), team_b.to_owned())
        } else {
            (team_b.to_owned(), team_a.to_owned())
        };
        Self {
            season,
            week,
            team_low,
            team_high,
        }
    }
}

/// One element of the store. Rows that don't decode as a [`GameRecord`]
/// (legacy hand-edits, missing fields) stay raw: every pass leaves them
/// untouched and they re-serialize exactly as they were read.
#[derive(Debug, Clone)]
pub enum StoreEntry {
    Game(GameRecord),
    Raw(Value),
}

impl StoreEntry {
    pub fn as_game(&self) -> Option<&GameRecord> {
        match self {
            StoreEntry::Game(g) => Some(g),
            StoreEntry::Raw(_) => None,
        }
    }

    pub fn as_game_mut(&mut self) -> Option<&mut GameRecord> {
        match self {
            StoreEntry::Game(g) => Some(g),
            StoreEntry::Raw(_) => None,
        }
    }

    /// Best-effort dedup key. Raw rows yield one only when a season is
    /// recoverable; a missing week counts as 0 and missing names as "".
    pub fn key(&self) -> Option<GameKey> {
        match self {
            StoreEntry::Game(g) => Some(GameKey::new(
                i64::from(g.season),
                u64::from(g.week.unwrap_or(0)),
                &g.team_a,
                &g.team_b,
            )),
            StoreEntry::Raw(v) => {
                let season = v.get("season")?.as_i64()?;
                let week = v.get("week").and_then(Value::as_u64).unwrap_or(0);
                let team_a = v.get("teamA").and_then(Value::as_str).unwrap_or("");
                let team_b = v.get("teamB").and_then(Value::as_str).unwrap_or("");
                Some(GameKey::new(season, week, team_a, team_b))
            }
        }
    }

    fn season(&self) -> Option<i64> {
        match self {
            StoreEntry::Game(g) => Some(i64::from(g.season)),
            StoreEntry::Raw(v) => v.get("season").and_then(Value::as_i64),
        }
    }

    /// (date, week, teamA, teamB) — dates compare as their ISO strings,
    /// which orders the same as the dates themselves.
    fn sort_key(&self) -> (String, u64, String, String) {
        match self {
            StoreEntry::Game(g) => (
                g.date.to_string(),
                u64::from(g.week.unwrap_or(0)),
                g.team_a.clone(),
                g.team_b.clone(),
            ),
            StoreEntry::Raw(v) => (
                v.get("date")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_owned(),
                v.get("week").and_then(Value::as_u64).unwrap_or(0),
                v.get("teamA")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_owned(),
                v.get("teamB")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_owned(),
            ),
        }
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            StoreEntry::Game(g) => serde_json::to_value(g),
            StoreEntry::Raw(v) => Ok(v.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortMode {
    None,
    #[default]
    Season,
    Global,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    entries: Vec<StoreEntry>,
}

impl RecordStore {
    pub fn from_entries(entries: Vec<StoreEntry>) -> Self {
        Self { entries }
    }

    /// Read and decode the store file. A file whose top level is not a JSON
    /// array is fatal before any write happens.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading store file {}", path.display()))?;
        let root: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing store file {}", path.display()))?;
        let Value::Array(rows) = root else {
            bail!("store file {} must be a JSON array of games", path.display());
        };

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| match serde_json::from_value::<GameRecord>(row.clone()) {
                Ok(game) => StoreEntry::Game(game),
                Err(e) => {
                    debug!(row = i, error = %e, "keeping undecodable store row as raw JSON");
                    StoreEntry::Raw(row)
                }
            })
            .collect();
        Ok(Self { entries })
    }

    /// Write the store pretty-printed, UTF-8, newline-terminated.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let rows: Vec<Value> = self
            .entries
            .iter()
            .map(StoreEntry::to_value)
            .collect::<Result<_, _>>()?;
        let mut text = serde_json::to_string_pretty(&rows)?;
        text.push('\n');
        fs::write(path, text)
            .with_context(|| format!("writing store file {}", path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StoreEntry] {
        &self.entries
    }

    pub fn games_mut(&mut self) -> impl Iterator<Item = &mut GameRecord> {
        self.entries.iter_mut().filter_map(StoreEntry::as_game_mut)
    }

    pub fn push(&mut self, game: GameRecord) {
        self.entries.push(StoreEntry::Game(game));
    }

    /// Keys of every row that has one; rows without a recoverable key simply
    /// can't guard against duplicates.
    pub fn existing_keys(&self) -> HashSet<GameKey> {
        self.entries.iter().filter_map(StoreEntry::key).collect()
    }

    /// Reorder the store.
    ///
    /// `Season` resorts only the rows of `season`, moving them as one block
    /// behind every other row (which keeps its original order). `Global`
    /// resorts everything by (season, date, week, teamA, teamB).
    pub fn sort(&mut self, mode: SortMode, season: i32) {
        match mode {
            SortMode::None => {}
            SortMode::Season => {
                let mut rest = Vec::with_capacity(self.entries.len());
                let mut target = Vec::new();
                for entry in self.entries.drain(..) {
                    if entry.season() == Some(i64::from(season)) {
                        target.push(entry);
                    } else {
                        rest.push(entry);
                    }
                }
                target.sort_by_key(StoreEntry::sort_key);
                rest.extend(target);
                self.entries = rest;
            }
            SortMode::Global => {
                self.entries
                    .sort_by_key(|e| (e.season().unwrap_or(0), e.sort_key()));
            }
        }
    }
}

/// Refuse to clobber the input file unless the operator opted in.
pub fn guard_overwrite(input: &Path, output: &Path, in_place: bool) -> anyhow::Result<()> {
    let input_abs = std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf());
    let output_abs = std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf());
    if input_abs == output_abs && !in_place {
        bail!(
            "refusing to overwrite {} in place without --in-place",
            input.display()
        );
    }
    Ok(())
}
