use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::types::{PlayerId, PlayerRecord};

/// A played match with structured rosters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    pub date: NaiveDate,
    pub roster_a: Vec<PlayerId>,
    pub roster_b: Vec<PlayerId>,
    pub goals_a: u32,
    pub goals_b: u32,
}

impl MatchRecord {
    /// Roster that scored strictly more goals, or None for a draw.
    pub fn winning_roster(&self) -> Option<&[PlayerId]> {
        if self.goals_a > self.goals_b {
            Some(&self.roster_a)
        } else if self.goals_b > self.goals_a {
            Some(&self.roster_b)
        } else {
            None
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.roster_a.contains(&player) || self.roster_b.contains(&player)
    }
}

/// Count wins per player. A player earns a win only as an exact member of
/// the roster that outscored the other one, at most once per match.
pub fn win_counts(matches: &[MatchRecord]) -> HashMap<PlayerId, u32> {
    let mut counts = HashMap::new();
    for record in matches {
        if let Some(winners) = record.winning_roster() {
            let unique: HashSet<PlayerId> = winners.iter().copied().collect();
            for id in unique {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
    }
    counts
}

pub fn win_count(matches: &[MatchRecord], player: PlayerId) -> u32 {
    matches
        .iter()
        .filter(|m| m.winning_roster().is_some_and(|r| r.contains(&player)))
        .count() as u32
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub player: PlayerRecord,
    pub played: u32,
    pub wins: u32,
    pub win_pct: f64,
}

/// Build the standings table, ordered by win percentage, then matches played
/// (both descending), then name.
pub fn standings(players: &[PlayerRecord], matches: &[MatchRecord]) -> Vec<Standing> {
    let wins = win_counts(matches);

    let mut rows: Vec<Standing> = players
        .iter()
        .map(|player| {
            let played = matches.iter().filter(|m| m.involves(player.id)).count() as u32;
            let won = wins.get(&player.id).copied().unwrap_or(0);
            let win_pct = if played == 0 {
                0.0
            } else {
                ((won as f64 / played as f64) * 10_000.0).round() / 100.0
            };
            Standing {
                player: player.clone(),
                played,
                wins: won,
                win_pct,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.win_pct
            .partial_cmp(&a.win_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.played.cmp(&a.played))
            .then_with(|| a.player.name.cmp(&b.player.name))
    });

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Position;

    fn record(id: u64, a: &[u64], b: &[u64], goals_a: u32, goals_b: u32) -> MatchRecord {
        MatchRecord {
            id,
            date: NaiveDate::from_ymd_opt(2024, 5, id as u32).unwrap(),
            roster_a: a.iter().map(|&i| PlayerId(i)).collect(),
            roster_b: b.iter().map(|&i| PlayerId(i)).collect(),
            goals_a,
            goals_b,
        }
    }

    fn player(id: u64, name: &str) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId(id),
            name: name.to_string(),
            position: Position::Midfielder,
        }
    }

    #[test]
    fn test_win_counts_exact_membership() {
        let matches = vec![
            record(1, &[1, 2], &[3, 4], 3, 1),
            record(2, &[1, 3], &[2, 4], 0, 2),
        ];
        let counts = win_counts(&matches);
        assert_eq!(counts.get(&PlayerId(1)), Some(&1));
        assert_eq!(counts.get(&PlayerId(2)), Some(&2));
        assert_eq!(counts.get(&PlayerId(3)), None);
        assert_eq!(counts.get(&PlayerId(4)), Some(&1));
    }

    #[test]
    fn test_repeated_roster_entry_counts_once() {
        let players = vec![player(1, "Ana"), player(2, "Bruno")];
        let matches = vec![record(1, &[1, 1], &[2], 1, 0)];
        assert_eq!(win_counts(&matches).get(&PlayerId(1)), Some(&1));
        assert_eq!(win_count(&matches, PlayerId(1)), 1);
        let table = standings(&players, &matches);
        assert_eq!(table[0].player.name, "Ana");
        assert_eq!(table[0].played, 1);
        assert_eq!(table[0].wins, 1);
        assert_eq!(table[0].win_pct, 100.0);
    }

    #[test]
    fn test_draw_awards_nobody() {
        let matches = vec![record(1, &[1], &[2], 2, 2)];
        assert!(win_counts(&matches).is_empty());
        assert_eq!(win_count(&matches, PlayerId(1)), 0);
    }

    #[test]
    fn test_similar_names_do_not_share_wins() {
        // "Ana" and "Anabel" are different ids; only the roster member wins.
        let players = vec![player(1, "Ana"), player(2, "Anabel")];
        let matches = vec![record(1, &[2], &[3], 1, 0)];
        let table = standings(&players, &matches);
        let ana = table.iter().find(|s| s.player.name == "Ana").unwrap();
        assert_eq!(ana.wins, 0);
        assert_eq!(ana.played, 0);
        let anabel = table.iter().find(|s| s.player.name == "Anabel").unwrap();
        assert_eq!(anabel.wins, 1);
    }

    #[test]
    fn test_win_count_single_player() {
        let matches = vec![
            record(1, &[1, 2], &[3, 4], 3, 1),
            record(2, &[1, 3], &[2, 4], 4, 2),
        ];
        assert_eq!(win_count(&matches, PlayerId(1)), 2);
        assert_eq!(win_count(&matches, PlayerId(4)), 0);
    }

    #[test]
    fn test_standings_order_and_percentages() {
        let players = vec![player(1, "Ana"), player(2, "Bruno"), player(3, "Caro"), player(4, "Dani")];
        let matches = vec![
            record(1, &[1, 2], &[3, 4], 3, 1),
            record(2, &[1, 3], &[2, 4], 2, 0),
            record(3, &[2, 3], &[1, 4], 1, 0),
        ];
        let table = standings(&players, &matches);

        assert_eq!(table[0].player.name, "Caro");
        assert_eq!(table[0].played, 2);
        assert_eq!(table[0].win_pct, 100.0);
        // Ana and Bruno tie on percentage and matches played; name breaks the tie.
        assert_eq!(table[1].player.name, "Ana");
        assert_eq!(table[1].wins, 2);
        assert_eq!(table[1].played, 3);
        assert_eq!(table[1].win_pct, 66.67);
        assert_eq!(table[2].player.name, "Bruno");
        assert_eq!(table[3].player.name, "Dani");
        assert_eq!(table[3].played, 3);
        assert_eq!(table[3].win_pct, 0.0);
    }

    #[test]
    fn test_standings_player_without_matches() {
        let players = vec![player(1, "Ana")];
        let table = standings(&players, &[]);
        assert_eq!(table[0].played, 0);
        assert_eq!(table[0].win_pct, 0.0);
    }
}
