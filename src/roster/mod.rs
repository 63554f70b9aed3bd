pub mod history;
pub mod types;

pub use history::{standings, win_count, win_counts, MatchRecord, Standing};
pub use types::{Player, PlayerId, PlayerRecord, Position};
