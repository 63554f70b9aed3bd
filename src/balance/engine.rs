use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use super::combinations::{binomial, Combinations};
use super::evaluator::{evaluate, team_wins, SplitScore};
use super::filter::{accepts, PositionCounts};
use super::params::BalanceParams;
use super::progress::{CancellationToken, ProgressSink, Throttle};
use crate::roster::{Player, PlayerId, Position};

/// Why a run was rejected before any candidate was enumerated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    #[error("team size must be at least 1")]
    TeamSizeZero,

    #[error("pool has {pool} players but must hold exactly twice the team size ({team_size})")]
    PoolSizeMismatch { pool: usize, team_size: usize },

    #[error("player {id} appears more than once in the pool")]
    DuplicatePlayer { id: PlayerId },

    #[error("win weight must be a non-negative number, got {weight}")]
    InvalidWinWeight { weight: f64 },

    #[error("a pool of {pool} players has too many splits to enumerate")]
    PoolTooLarge { pool: usize },
}

/// The selected split.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedTeams {
    /// Team A in pool order
    pub team_a: Vec<PlayerId>,
    /// Team B in pool order
    pub team_b: Vec<PlayerId>,
    pub wins_a: u64,
    pub wins_b: u64,
    pub raw_diff: u64,
    pub weighted_diff: f64,
    /// Lexicographic rank of team A among all candidates
    pub candidate_index: u64,
}

/// Terminal value of one engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    Found(BalancedTeams),
    NoFeasibleSplit,
    Cancelled,
    InvalidConfiguration(ConfigIssue),
}

impl BalanceOutcome {
    pub fn found(&self) -> Option<&BalancedTeams> {
        match self {
            BalanceOutcome::Found(teams) => Some(teams),
            _ => None,
        }
    }
}

/// Pool flattened into parallel arrays indexed by pool position.
pub(crate) struct PreparedPool {
    pub(crate) ids: Vec<PlayerId>,
    pub(crate) positions: Vec<Position>,
    pub(crate) wins: Vec<u32>,
    pub(crate) counts: PositionCounts,
    pub(crate) total_wins: u64,
    pub(crate) team_size: usize,
    pub(crate) total: u64,
}

impl PreparedPool {
    pub(crate) fn new(pool: &[Player], params: &BalanceParams) -> Result<Self, ConfigIssue> {
        let k = params.team_size;
        if k < 1 {
            return Err(ConfigIssue::TeamSizeZero);
        }
        if !params.win_weight.is_finite() || params.win_weight < 0.0 {
            return Err(ConfigIssue::InvalidWinWeight {
                weight: params.win_weight,
            });
        }

        let mut seen = HashSet::with_capacity(pool.len());
        if let Some(dup) = pool.iter().find(|p| !seen.insert(p.id)) {
            return Err(ConfigIssue::DuplicatePlayer { id: dup.id });
        }

        if k.checked_mul(2) != Some(pool.len()) {
            return Err(ConfigIssue::PoolSizeMismatch {
                pool: pool.len(),
                team_size: k,
            });
        }

        let total = binomial(pool.len(), k).ok_or(ConfigIssue::PoolTooLarge { pool: pool.len() })?;

        Ok(Self {
            ids: pool.iter().map(|p| p.id).collect(),
            positions: pool.iter().map(|p| p.position).collect(),
            wins: pool.iter().map(|p| p.win_count).collect(),
            counts: PositionCounts::from_positions(pool.iter().map(|p| p.position)),
            total_wins: pool.iter().map(|p| p.win_count as u64).sum(),
            team_size: k,
            total,
        })
    }

    /// Quota check then scoring for team A given as pool indices.
    /// Rejected candidates are never scored.
    pub(crate) fn score(&self, team_a: &[usize], params: &BalanceParams) -> Option<SplitScore> {
        let counts_a = PositionCounts::from_positions(team_a.iter().map(|&i| self.positions[i]));
        let counts_b = counts_a.complement_in(&self.counts);
        if !accepts(&counts_a, &counts_b, params) {
            return None;
        }
        let wins_a = team_wins(team_a, &self.wins);
        Some(evaluate(wins_a, self.total_wins, params.win_weight))
    }

    pub(crate) fn assemble(&self, best: &Best) -> BalancedTeams {
        let mut in_a = vec![false; self.ids.len()];
        for &i in &best.team_a {
            in_a[i] = true;
        }
        let mut team_a = Vec::with_capacity(self.team_size);
        let mut team_b = Vec::with_capacity(self.team_size);
        for (id, &a) in self.ids.iter().zip(&in_a) {
            if a {
                team_a.push(*id);
            } else {
                team_b.push(*id);
            }
        }
        BalancedTeams {
            team_a,
            team_b,
            wins_a: best.score.wins_a,
            wins_b: best.score.wins_b,
            raw_diff: best.score.raw_diff,
            weighted_diff: best.score.weighted_diff,
            candidate_index: best.index,
        }
    }
}

/// Best candidate seen so far, tagged with its global enumeration index.
#[derive(Debug, Clone)]
pub(crate) struct Best {
    pub(crate) index: u64,
    pub(crate) key: u64,
    pub(crate) score: SplitScore,
    pub(crate) team_a: Vec<usize>,
}

impl Best {
    /// Strictly better on `(key, index)`: the earliest candidate wins ties.
    pub(crate) fn beats(&self, other: &Best) -> bool {
        (self.key, self.index) < (other.key, other.index)
    }
}

pub(crate) enum Scan {
    Completed(Option<Best>),
    Cancelled,
}

/// Fold candidates with ranks in `start..end` into a local best.
///
/// `tick` runs after every candidate, accepted or not, before the
/// cancellation check.
pub(crate) fn scan_range(
    prep: &PreparedPool,
    params: &BalanceParams,
    start: u64,
    end: u64,
    cancel: &CancellationToken,
    mut tick: impl FnMut(),
) -> Scan {
    let Some(mut combos) = Combinations::from_rank(prep.ids.len(), prep.team_size, start) else {
        return Scan::Completed(None);
    };
    let mut best: Option<Best> = None;

    while let Some((index, team_a)) = combos.advance() {
        if index >= end {
            break;
        }

        if let Some(score) = prep.score(team_a, params) {
            let key = score.rank_key(params.win_weight);
            if best.as_ref().map_or(true, |b| key < b.key) {
                best = Some(Best {
                    index,
                    key,
                    score,
                    team_a: team_a.to_vec(),
                });
            }
        }

        tick();
        if cancel.is_cancelled() {
            return Scan::Cancelled;
        }
    }

    Scan::Completed(best)
}

/// Split `pool` into two equal teams that meet the positional quotas and
/// minimise the weighted win difference.
///
/// Every C(N, k) candidate is visited exactly once in lexicographic order.
/// Ties keep the earliest candidate.
pub fn balance(
    pool: &[Player],
    params: &BalanceParams,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> BalanceOutcome {
    let prep = match PreparedPool::new(pool, params) {
        Ok(prep) => prep,
        Err(issue) => {
            debug!(%issue, "rejecting balance run");
            return BalanceOutcome::InvalidConfiguration(issue);
        }
    };

    debug!(
        pool = pool.len(),
        team_size = prep.team_size,
        candidates = prep.total,
        "starting balance run"
    );

    let throttle = Throttle::new(progress, prep.total);
    let mut processed = 0u64;
    let scan = scan_range(&prep, params, 0, prep.total, cancel, || {
        processed += 1;
        throttle.processed(processed);
    });

    finish(&prep, scan)
}

pub(crate) fn finish(prep: &PreparedPool, scan: Scan) -> BalanceOutcome {
    match scan {
        Scan::Cancelled => {
            debug!("balance run cancelled");
            BalanceOutcome::Cancelled
        }
        Scan::Completed(None) => {
            debug!(candidates = prep.total, "no split satisfies the quotas");
            BalanceOutcome::NoFeasibleSplit
        }
        Scan::Completed(Some(best)) => {
            let teams = prep.assemble(&best);
            info!(
                index = teams.candidate_index,
                wins_a = teams.wins_a,
                wins_b = teams.wins_b,
                weighted_diff = teams.weighted_diff,
                "selected split"
            );
            BalanceOutcome::Found(teams)
        }
    }
}
