use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use terminal_size::{terminal_size, Width};

use crate::balance::BalancedTeams;
use crate::roster::{MatchRecord, PlayerId, PlayerRecord, Standing};
use crate::store::TeamGeneration;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Widest name column that still fits the terminal next to `fixed_width`
/// characters of other columns. Pipes get the full name.
fn name_budget(fixed_width: usize) -> Option<usize> {
    get_terminal_width().map(|w| {
        if w > fixed_width + 10 {
            w - fixed_width
        } else {
            10
        }
    })
}

fn player_name(id: PlayerId, players: &[PlayerRecord]) -> String {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn roster_names(ids: &[PlayerId], players: &[PlayerRecord]) -> String {
    ids.iter()
        .map(|id| player_name(*id, players))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format registered players, one per line: "id  name  position"
pub fn format_players(players: &[PlayerRecord], use_colors: bool) -> String {
    if players.is_empty() {
        return "No players registered.".to_string();
    }

    let budget = name_budget(4 + 2 + 2 + 10);
    players
        .iter()
        .map(|p| {
            let id = format!("{:>4}", p.id.0);
            let name = match budget {
                Some(w) => truncate_name(&p.name, w),
                None => p.name.clone(),
            };
            if use_colors {
                format!("{}  {}  {}", id.dimmed(), name.bold(), p.position.cyan())
            } else {
                format!("{}  {}  {}", id, name, p.position)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_team(title: &str, ids: &[PlayerId], wins: u64, players: &[PlayerRecord], use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(ids.len() + 2);
    if use_colors {
        lines.push(format!("{}", title.bold().underline()));
    } else {
        lines.push(title.to_string());
    }
    for id in ids {
        let (name, position) = players
            .iter()
            .find(|p| p.id == *id)
            .map(|p| (p.name.clone(), p.position.label()))
            .unwrap_or_else(|| (id.to_string(), "?"));
        if use_colors {
            lines.push(format!("  {} ({})", name, position.cyan()));
        } else {
            lines.push(format!("  {} ({})", name, position));
        }
    }
    lines.push(format!("  Total wins: {}", wins));
    lines.join("\n")
}

/// Format a balanced split with both rosters and the win totals
pub fn format_teams(teams: &BalancedTeams, players: &[PlayerRecord], use_colors: bool) -> String {
    let diff_line = format!(
        "Win difference (weighted): {:.2}\nWin difference (unweighted): {}",
        teams.weighted_diff, teams.raw_diff
    );
    format!(
        "{}\n\n{}\n\n{}",
        format_team("Team 1", &teams.team_a, teams.wins_a, players, use_colors),
        format_team("Team 2", &teams.team_b, teams.wins_b, players, use_colors),
        if use_colors {
            diff_line.yellow().to_string()
        } else {
            diff_line
        }
    )
}

/// Format a stored split for a match day
pub fn format_generation(generation: &TeamGeneration, players: &[PlayerRecord], use_colors: bool) -> String {
    format!(
        "Teams for {}\n\n{}\n\n{}",
        generation.date,
        format_team("Team 1", &generation.team_a, generation.wins_a, players, use_colors),
        format_team("Team 2", &generation.team_b, generation.wins_b, players, use_colors),
    )
}

/// Format match history, one line per match:
/// "id  date  roster A  goals - goals  roster B"
pub fn format_matches(matches: &[MatchRecord], players: &[PlayerRecord], use_colors: bool) -> String {
    if matches.is_empty() {
        return "No matches recorded.".to_string();
    }

    matches
        .iter()
        .map(|m| {
            let id = format!("{:>4}", m.id);
            let score = format!("{} - {}", m.goals_a, m.goals_b);
            let a = roster_names(&m.roster_a, players);
            let b = roster_names(&m.roster_b, players);
            if use_colors {
                format!("{}  {}  {}  {}  {}", id.dimmed(), m.date, a, score.bold(), b)
            } else {
                format!("{}  {}  {}  {}  {}", id, m.date, a, score, b)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the standings table with a header row
pub fn format_standings(rows: &[Standing], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No players registered.".to_string();
    }

    // Rank 4, position 10, played 6, wins 6, pct 8, separators
    let fixed_width = 4 + 10 + 6 + 6 + 8 + 2 * 5;
    let name_width = rows
        .iter()
        .map(|r| r.player.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let name_width = match name_budget(fixed_width) {
        Some(budget) => name_width.min(budget),
        None => name_width,
    };

    let header = format!(
        "{:>4}  {:<nw$}  {:<10}  {:>6}  {:>6}  {:>8}",
        "#",
        "Name",
        "Position",
        "Played",
        "Wins",
        "Win %",
        nw = name_width
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "{:>4}  {:<nw$}  {:<10}  {:>6}  {:>6}  {:>7.2}%",
            format!("{}.", i + 1),
            truncate_name(&row.player.name, name_width),
            row.player.position.label(),
            row.played,
            row.wins,
            row.win_pct,
            nw = name_width
        );
        lines.push(line);
    }

    lines.join("\n")
}

/// Format elapsed run time, rounded to milliseconds
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(millis).to_string()
}
