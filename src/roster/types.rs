use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier assigned by the store when a player is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Forward,
        Position::Midfielder,
        Position::Defender,
        Position::Goalkeeper,
    ];

    /// Parse a position name. Accepts English names, common abbreviations and
    /// the Spanish labels used by older rosters.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "forward" | "fw" | "delantero" => Ok(Position::Forward),
            "midfielder" | "mf" | "mediocampista" => Ok(Position::Midfielder),
            "defender" | "df" | "defensor" => Ok(Position::Defender),
            "goalkeeper" | "gk" | "arquero" => Ok(Position::Goalkeeper),
            other => bail!(
                "Unknown position '{}'. Expected forward, midfielder, defender or goalkeeper",
                other
            ),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Forward => "Forward",
            Position::Midfielder => "Midfielder",
            Position::Defender => "Defender",
            Position::Goalkeeper => "Goalkeeper",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered player as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
}

/// A player as seen by the balancing engine: identity, position and the
/// historical win count supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub win_count: u32,
}

impl Player {
    pub fn new(id: u64, name: &str, position: Position, win_count: u32) -> Self {
        Self {
            id: PlayerId(id),
            name: name.to_string(),
            position,
            win_count,
        }
    }

    pub fn from_record(record: &PlayerRecord, win_count: u32) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            position: record.position,
            win_count,
        }
    }
}
