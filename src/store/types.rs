use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::balance::BalancedTeams;
use crate::roster::{MatchRecord, PlayerId, PlayerRecord};

pub const DATABASE_VERSION: u32 = 1;

/// Everything the app persists, kept in a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub version: u32,
    #[serde(default)]
    pub next_player_id: u64,
    #[serde(default)]
    pub next_match_id: u64,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub generations: Vec<TeamGeneration>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            version: DATABASE_VERSION,
            next_player_id: 1,
            next_match_id: 1,
            players: Vec::new(),
            matches: Vec::new(),
            generations: Vec::new(),
        }
    }
}

/// A generated split saved for a match day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGeneration {
    pub date: NaiveDate,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub wins_a: u64,
    pub wins_b: u64,
    pub weighted_diff: f64,
}

impl TeamGeneration {
    pub fn from_teams(date: NaiveDate, teams: &BalancedTeams) -> Self {
        Self {
            date,
            team_a: teams.team_a.clone(),
            team_b: teams.team_b.clone(),
            wins_a: teams.wins_a,
            wins_b: teams.wins_b,
            weighted_diff: teams.weighted_diff,
        }
    }
}
