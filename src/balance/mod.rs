pub mod combinations;
pub mod engine;
pub mod evaluator;
pub mod filter;
pub mod parallel;
pub mod params;
pub mod progress;
pub mod validation;

pub use combinations::{binomial, Combinations};
pub use engine::{balance, BalanceOutcome, BalancedTeams, ConfigIssue};
pub use evaluator::SplitScore;
pub use filter::PositionCounts;
pub use parallel::balance_parallel;
pub use params::BalanceParams;
pub use progress::{CancellationToken, NoProgress, ProgressSink};
pub use validation::validate_params;

#[cfg(test)]
mod proptests;
