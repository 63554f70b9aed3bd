use super::params::BalanceParams;
use crate::roster::Position;

/// Head count per position for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts {
    pub forwards: usize,
    pub midfielders: usize,
    pub defenders: usize,
    pub goalkeepers: usize,
}

impl PositionCounts {
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut counts = Self::default();
        for position in positions {
            counts.add(position);
        }
        counts
    }

    pub fn add(&mut self, position: Position) {
        match position {
            Position::Forward => self.forwards += 1,
            Position::Midfielder => self.midfielders += 1,
            Position::Defender => self.defenders += 1,
            Position::Goalkeeper => self.goalkeepers += 1,
        }
    }

    /// Counts for the rest of the pool once `self` is taken out of `pool`.
    pub fn complement_in(&self, pool: &PositionCounts) -> PositionCounts {
        PositionCounts {
            forwards: pool.forwards - self.forwards,
            midfielders: pool.midfielders - self.midfielders,
            defenders: pool.defenders - self.defenders,
            goalkeepers: pool.goalkeepers - self.goalkeepers,
        }
    }

    /// Whether this team alone meets the per-team quotas. Goalkeepers are
    /// never constrained.
    pub fn meets_quotas(&self, params: &BalanceParams) -> bool {
        self.defenders <= params.max_defenders
            && self.midfielders >= params.min_midfielders
            && self.forwards >= params.min_forwards
    }
}

/// Accept a split iff both sides meet the same quotas.
pub fn accepts(team_a: &PositionCounts, team_b: &PositionCounts, params: &BalanceParams) -> bool {
    team_a.meets_quotas(params) && team_b.meets_quotas(params)
}
