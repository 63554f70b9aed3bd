use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::storage::{load_database, save_database};
use super::types::{Database, TeamGeneration};
use crate::roster::{self, MatchRecord, Player, PlayerId, PlayerRecord, Position};

/// Source of players and their historical win counts.
pub trait PlayerDirectory {
    fn list_players(&self) -> Result<Vec<PlayerRecord>>;

    /// Case-insensitive lookup by name.
    fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>>;

    /// Matches won as an exact member of the winning roster.
    fn win_count(&self, player: PlayerId) -> Result<u32>;

    /// Resolve ids into engine players, win counts included, keeping order.
    fn pool(&self, ids: &[PlayerId]) -> Result<Vec<Player>>;
}

pub trait MatchHistoryStore {
    fn append_match(&self, draft: MatchDraft) -> Result<MatchRecord>;

    /// Most recent first.
    fn list_matches(&self) -> Result<Vec<MatchRecord>>;

    /// Returns true if a match with this id existed.
    fn delete_match(&self, id: u64) -> Result<bool>;
}

pub trait TeamGenerationStore {
    /// Store the split for its date, replacing any earlier one.
    fn save_generation(&self, generation: TeamGeneration) -> Result<()>;

    fn generation_for(&self, date: NaiveDate) -> Result<Option<TeamGeneration>>;
}

/// A match result before the store assigns its id.
#[derive(Debug, Clone)]
pub struct MatchDraft {
    pub date: NaiveDate,
    pub roster_a: Vec<PlayerId>,
    pub roster_b: Vec<PlayerId>,
    pub goals_a: u32,
    pub goals_b: u32,
}

/// JSON-file repository. Holds only the path: every operation opens the
/// file, works on it and writes it back before returning.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Database> {
        load_database(&self.path)
    }

    fn update<T>(&self, op: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut db = self.read()?;
        let out = op(&mut db)?;
        save_database(&self.path, &db)?;
        Ok(out)
    }

    pub fn add_player(&self, name: &str, position: Position) -> Result<PlayerRecord> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Player name cannot be empty");
        }
        self.update(|db| {
            if db.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
                bail!("A player named '{}' already exists", name);
            }
            let record = PlayerRecord {
                id: PlayerId(db.next_player_id.max(1)),
                name: name.to_string(),
                position,
            };
            db.next_player_id = record.id.0 + 1;
            db.players.push(record.clone());
            debug!(id = record.id.0, name = %record.name, "registered player");
            Ok(record)
        })
    }

    /// Resolve a list of names into ids, failing on the first unknown one.
    pub fn resolve_names(&self, names: &[String]) -> Result<Vec<PlayerId>> {
        let players = self.read()?.players;
        names
            .iter()
            .map(|name| {
                players
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
                    .map(|p| p.id)
                    .with_context(|| format!("Unknown player '{}'", name.trim()))
            })
            .collect()
    }
}

impl PlayerDirectory for Repository {
    fn list_players(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.read()?.players)
    }

    fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>> {
        let name = name.trim();
        Ok(self
            .read()?
            .players
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    fn win_count(&self, player: PlayerId) -> Result<u32> {
        Ok(roster::win_count(&self.read()?.matches, player))
    }

    fn pool(&self, ids: &[PlayerId]) -> Result<Vec<Player>> {
        let db = self.read()?;
        let wins = roster::win_counts(&db.matches);
        ids.iter()
            .map(|id| {
                let record = db
                    .players
                    .iter()
                    .find(|p| p.id == *id)
                    .with_context(|| format!("Unknown player id {}", id))?;
                Ok(Player::from_record(record, wins.get(id).copied().unwrap_or(0)))
            })
            .collect()
    }
}

impl MatchHistoryStore for Repository {
    fn append_match(&self, draft: MatchDraft) -> Result<MatchRecord> {
        if draft.roster_a.is_empty() || draft.roster_b.is_empty() {
            bail!("Both rosters need at least one player");
        }
        let mut a = HashSet::with_capacity(draft.roster_a.len());
        if let Some(id) = draft.roster_a.iter().find(|id| !a.insert(**id)) {
            bail!("Player {} is listed twice in the same team", id);
        }
        let mut b = HashSet::with_capacity(draft.roster_b.len());
        if let Some(id) = draft.roster_b.iter().find(|id| !b.insert(**id)) {
            bail!("Player {} is listed twice in the same team", id);
        }
        if let Some(id) = draft.roster_b.iter().find(|id| a.contains(*id)) {
            bail!("Player {} cannot play for both teams", id);
        }

        self.update(|db| {
            let known: HashSet<_> = db.players.iter().map(|p| p.id).collect();
            if let Some(id) = draft
                .roster_a
                .iter()
                .chain(&draft.roster_b)
                .find(|id| !known.contains(*id))
            {
                bail!("Unknown player id {}", id);
            }

            let record = MatchRecord {
                id: db.next_match_id.max(1),
                date: draft.date,
                roster_a: draft.roster_a,
                roster_b: draft.roster_b,
                goals_a: draft.goals_a,
                goals_b: draft.goals_b,
            };
            db.next_match_id = record.id + 1;
            db.matches.push(record.clone());
            debug!(id = record.id, date = %record.date, "recorded match");
            Ok(record)
        })
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>> {
        let mut matches = self.read()?.matches;
        matches.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(matches)
    }

    fn delete_match(&self, id: u64) -> Result<bool> {
        self.update(|db| {
            let before = db.matches.len();
            db.matches.retain(|m| m.id != id);
            Ok(db.matches.len() != before)
        })
    }
}

impl TeamGenerationStore for Repository {
    fn save_generation(&self, generation: TeamGeneration) -> Result<()> {
        self.update(|db| {
            db.generations.retain(|g| g.date != generation.date);
            debug!(date = %generation.date, "saved team generation");
            db.generations.push(generation);
            Ok(())
        })
    }

    fn generation_for(&self, date: NaiveDate) -> Result<Option<TeamGeneration>> {
        Ok(self
            .read()?
            .generations
            .into_iter()
            .find(|g| g.date == date))
    }
}
