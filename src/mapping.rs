//! Roster-id → canonical team name mapping, maintained by hand by the
//! operator. Sleeper roster ids and display names churn; the store's team
//! names must not.

use anyhow::Context;
use sleeper_api::TeamEntry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct TeamMapping {
    names: HashMap<String, String>,
}

/// A roster the current league knows about that has no usable mapping entry,
/// with enough context for the operator to fill it in.
#[derive(Debug, Clone)]
pub struct MissingMapping {
    pub roster_id: u32,
    pub display_name: String,
    pub username: String,
    pub sleeper_team_name: String,
}

impl TeamMapping {
    /// Load a JSON object of roster-id (string) → canonical team name.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading mapping file {}", path.display()))?;
        let names: HashMap<String, String> = serde_json::from_str(&text)
            .with_context(|| format!("parsing mapping file {}", path.display()))?;
        Ok(Self { names })
    }

    pub fn from_names(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn get(&self, roster_id: u32) -> Option<&str> {
        self.names
            .get(&roster_id.to_string())
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// Resolve every current roster to its canonical name, or report the
    /// full set of rosters whose mapping entry is absent or blank.
    pub fn canonical_names(
        &self,
        teams: &[TeamEntry],
    ) -> Result<HashMap<u32, String>, Vec<MissingMapping>> {
        let mut resolved = HashMap::new();
        let mut missing = Vec::new();
        for team in teams {
            match self.get(team.roster_id) {
                Some(name) => {
                    resolved.insert(team.roster_id, name.to_owned());
                }
                None => missing.push(MissingMapping {
                    roster_id: team.roster_id,
                    display_name: team.display_name.clone(),
                    username: team.username.clone(),
                    sleeper_team_name: team.sleeper_team_name.clone(),
                }),
            }
        }
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(missing)
        }
    }
}
