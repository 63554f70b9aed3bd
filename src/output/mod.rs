pub mod formatter;

pub use formatter::{
    format_elapsed, format_generation, format_matches, format_players, format_standings,
    format_teams, should_use_colors,
};
