use serde::{Deserialize, Serialize};

/// Balancing parameters.
///
/// Quotas apply to each team independently. `win_weight` scales the win
/// imbalance penalty; zero disables win balancing.
///
/// Example YAML:
/// ```yaml
/// balance:
///   team_size: 5
///   max_defenders: 2
///   min_midfielders: 1
///   min_forwards: 1
///   win_weight: 1.0
///   workers: 4
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct BalanceParams {
    /// Players per team. The pool must hold exactly twice this many.
    pub team_size: usize,

    /// Upper bound on defenders in each team
    pub max_defenders: usize,

    /// Lower bound on midfielders in each team
    pub min_midfielders: usize,

    /// Lower bound on forwards in each team
    pub min_forwards: usize,

    /// Multiplier applied to the absolute win difference
    pub win_weight: f64,

    /// Worker threads for the partitioned engine (1 = sequential)
    pub workers: usize,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            team_size: 5,
            max_defenders: 4,
            min_midfielders: 1,
            min_forwards: 1,
            win_weight: 1.0,
            workers: 1,
        }
    }
}
