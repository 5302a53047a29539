//! Replays a season's transaction stream to reconstruct who has owned each
//! player, in order, plus waiver/free-agent pickup and drop counts.

use sleeper_api::{DraftPick, PlayerDirectory, Transaction};
use std::collections::{HashMap, HashSet};

/// Per-player custody state built from the draft plus every completed add.
#[derive(Debug, Default)]
pub struct OwnershipTracker {
    owners: HashMap<String, HashSet<u32>>,
    chains: HashMap<String, Vec<u32>>,
    pickups: HashMap<String, u32>,
    drops: HashMap<String, u32>,
    pickup_history: HashMap<String, Vec<u32>>,
    drop_history: HashMap<String, Vec<u32>>,
}

/// One row of a ranked report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    pub player_id: String,
    pub name: String,
    pub count: u32,
    pub chain: Vec<u32>,
}

impl OwnershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The drafting roster is a player's first owner.
    pub fn seed_draft(&mut self, picks: &[DraftPick]) {
        for pick in picks {
            self.push_history(&pick.player_id, pick.roster_id);
        }
    }

    /// Sort the stream by creation time and apply every transaction.
    pub fn replay(&mut self, mut transactions: Vec<Transaction>) {
        transactions.sort_by_key(|tx| tx.created);
        for tx in &transactions {
            self.apply(tx);
        }
    }

    /// Apply one transaction. Incomplete transactions (failed waiver bids,
    /// cancelled trades) change nothing.
    ///
    /// Every add — waiver, free agent, or the receiving side of a trade —
    /// extends the ownership chain. Only waiver/free-agent moves count
    /// toward the pickup and drop tallies.
    pub fn apply(&mut self, tx: &Transaction) {
        if !tx.complete {
            return;
        }

        for (player_id, roster_id) in &tx.adds {
            self.push_history(player_id, *roster_id);
        }

        if tx.kind.counts_as_pickup() {
            for (player_id, roster_id) in &tx.adds {
                *self.pickups.entry(player_id.clone()).or_default() += 1;
                self.pickup_history
                    .entry(player_id.clone())
                    .or_default()
                    .push(*roster_id);
            }
            for (player_id, roster_id) in &tx.drops {
                *self.drops.entry(player_id.clone()).or_default() += 1;
                self.drop_history
                    .entry(player_id.clone())
                    .or_default()
                    .push(*roster_id);
            }
        }
    }

    /// Append to the chain, collapsing consecutive duplicates: re-adding a
    /// player to the roster that already holds them is not a new custody
    /// segment. The unique-owner set always records the roster.
    fn push_history(&mut self, player_id: &str, roster_id: u32) {
        let chain = self.chains.entry(player_id.to_owned()).or_default();
        if chain.last() != Some(&roster_id) {
            chain.push(roster_id);
        }
        self.owners
            .entry(player_id.to_owned())
            .or_default()
            .insert(roster_id);
    }

    pub fn chain(&self, player_id: &str) -> &[u32] {
        self.chains.get(player_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unique_owner_count(&self, player_id: &str) -> usize {
        self.owners.get(player_id).map_or(0, HashSet::len)
    }

    pub fn pickup_count(&self, player_id: &str) -> u32 {
        self.pickups.get(player_id).copied().unwrap_or(0)
    }

    pub fn drop_count(&self, player_id: &str) -> u32 {
        self.drops.get(player_id).copied().unwrap_or(0)
    }

    /// Players ranked by distinct owning rosters, with the full ownership
    /// chain attached.
    pub fn top_owners(&self, limit: usize, players: &PlayerDirectory) -> Vec<RankedPlayer> {
        let counts = self
            .owners
            .iter()
            .map(|(pid, set)| (pid.clone(), set.len() as u32));
        rank(counts, &self.chains, limit, players)
    }

    /// Players ranked by waiver/free-agent pickups, with the sequence of
    /// rosters that picked them up.
    pub fn top_pickups(&self, limit: usize, players: &PlayerDirectory) -> Vec<RankedPlayer> {
        let counts = self.pickups.iter().map(|(pid, &c)| (pid.clone(), c));
        rank(counts, &self.pickup_history, limit, players)
    }

    /// Players ranked by waiver/free-agent drops, with the sequence of
    /// rosters that dropped them.
    pub fn top_drops(&self, limit: usize, players: &PlayerDirectory) -> Vec<RankedPlayer> {
        let counts = self.drops.iter().map(|(pid, &c)| (pid.clone(), c));
        rank(counts, &self.drop_history, limit, players)
    }
}

/// Rank descending by count; ties break ascending on resolved player name so
/// reruns print identical tables.
fn rank(
    counts: impl Iterator<Item = (String, u32)>,
    histories: &HashMap<String, Vec<u32>>,
    limit: usize,
    players: &PlayerDirectory,
) -> Vec<RankedPlayer> {
    let mut rows: Vec<RankedPlayer> = counts
        .map(|(player_id, count)| RankedPlayer {
            name: players.name(&player_id),
            chain: histories.get(&player_id).cloned().unwrap_or_default(),
            player_id,
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleeper_api::TransactionKind;

    fn pick(pid: &str, rid: u32) -> DraftPick {
        DraftPick {
            player_id: pid.into(),
            roster_id: rid,
        }
    }

    fn tx(
        kind: TransactionKind,
        complete: bool,
        adds: &[(&str, u32)],
        drops: &[(&str, u32)],
        created: i64,
    ) -> Transaction {
        Transaction {
            kind,
            complete,
            adds: adds.iter().map(|(p, r)| (p.to_string(), *r)).collect(),
            drops: drops.iter().map(|(p, r)| (p.to_string(), *r)).collect(),
            created,
        }
    }

    #[test]
    fn readd_to_same_roster_collapses_in_chain_but_not_owner_set() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("p1", 3)]);
        tracker.apply(&tx(TransactionKind::FreeAgent, true, &[("p1", 3)], &[], 1));
        assert_eq!(tracker.chain("p1"), &[3]);
        assert_eq!(tracker.unique_owner_count("p1"), 1);

        tracker.apply(&tx(TransactionKind::Waiver, true, &[("p1", 7)], &[], 2));
        assert_eq!(tracker.chain("p1"), &[3, 7]);
        assert_eq!(tracker.unique_owner_count("p1"), 2);
    }

    #[test]
    fn trades_extend_the_chain_but_count_nothing() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("p1", 1)]);
        tracker.apply(&tx(
            TransactionKind::Trade,
            true,
            &[("p1", 2)],
            &[("p1", 1)],
            5,
        ));
        assert_eq!(tracker.chain("p1"), &[1, 2]);
        assert_eq!(tracker.pickup_count("p1"), 0);
        assert_eq!(tracker.drop_count("p1"), 0);
    }

    #[test]
    fn incomplete_transactions_change_nothing() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("p1", 1)]);
        tracker.apply(&tx(
            TransactionKind::Waiver,
            false,
            &[("p1", 4)],
            &[("p2", 2)],
            5,
        ));
        assert_eq!(tracker.chain("p1"), &[1]);
        assert_eq!(tracker.unique_owner_count("p1"), 1);
        assert_eq!(tracker.pickup_count("p1"), 0);
        assert_eq!(tracker.drop_count("p2"), 0);
    }

    #[test]
    fn waiver_and_free_agent_moves_count_and_record_history() {
        let mut tracker = OwnershipTracker::new();
        tracker.apply(&tx(
            TransactionKind::Waiver,
            true,
            &[("p1", 2)],
            &[("p3", 5)],
            1,
        ));
        tracker.apply(&tx(
            TransactionKind::FreeAgent,
            true,
            &[("p1", 4)],
            &[("p1", 2)],
            2,
        ));
        assert_eq!(tracker.pickup_count("p1"), 2);
        assert_eq!(tracker.drop_count("p1"), 1);
        assert_eq!(tracker.drop_count("p3"), 1);
        assert_eq!(tracker.chain("p1"), &[2, 4]);

        let players = PlayerDirectory::default();
        let pickups = tracker.top_pickups(10, &players);
        assert_eq!(pickups[0].player_id, "p1");
        assert_eq!(pickups[0].chain, vec![2, 4]);
        let drops = tracker.top_drops(10, &players);
        assert_eq!(drops[0].chain, vec![2]);
    }

    #[test]
    fn replay_orders_by_creation_time() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("p1", 1)]);
        // Delivered out of order: the later add (roster 9) sorts last.
        tracker.replay(vec![
            tx(TransactionKind::FreeAgent, true, &[("p1", 9)], &[], 200),
            tx(TransactionKind::Waiver, true, &[("p1", 4)], &[], 100),
        ]);
        assert_eq!(tracker.chain("p1"), &[1, 4, 9]);
    }

    #[test]
    fn rankings_break_ties_on_name_ascending() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("b-player", 1), pick("a-player", 2)]);
        tracker.apply(&tx(
            TransactionKind::Waiver,
            true,
            &[("b-player", 3), ("a-player", 4)],
            &[],
            1,
        ));
        let players = PlayerDirectory::default(); // names fall back to ids
        let top = tracker.top_owners(10, &players);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].name, "a-player");
        assert_eq!(top[1].name, "b-player");
    }

    #[test]
    fn top_owners_attaches_the_collapsed_chain() {
        let mut tracker = OwnershipTracker::new();
        tracker.seed_draft(&[pick("p1", 3)]);
        tracker.replay(vec![
            tx(TransactionKind::FreeAgent, true, &[("p1", 3)], &[], 1),
            tx(TransactionKind::Waiver, true, &[("p1", 7)], &[], 2),
            tx(TransactionKind::Trade, true, &[("p1", 3)], &[], 3),
        ]);
        let players = PlayerDirectory::default();
        let top = tracker.top_owners(1, &players);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].chain, vec![3, 7, 3]);
    }
}
