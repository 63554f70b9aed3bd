/// Win totals and imbalance for one accepted split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitScore {
    pub wins_a: u64,
    pub wins_b: u64,
    /// |wins_a - wins_b|
    pub raw_diff: u64,
    /// raw_diff * win_weight
    pub weighted_diff: f64,
}

impl SplitScore {
    /// Ordering key. With a positive weight ranking on the integer gap is the
    /// same as ranking on the weighted gap, minus float rounding; with a zero
    /// weight every candidate ranks equal.
    pub fn rank_key(&self, win_weight: f64) -> u64 {
        if win_weight > 0.0 {
            self.raw_diff
        } else {
            0
        }
    }
}

/// Score a split from team A's win total and the pool's total.
pub fn evaluate(wins_a: u64, pool_wins: u64, win_weight: f64) -> SplitScore {
    let wins_b = pool_wins - wins_a;
    let raw_diff = wins_a.abs_diff(wins_b);
    SplitScore {
        wins_a,
        wins_b,
        raw_diff,
        weighted_diff: raw_diff as f64 * win_weight,
    }
}

/// Sum of win counts for the given pool indices.
pub fn team_wins(indices: &[usize], win_counts: &[u32]) -> u64 {
    indices.iter().map(|&i| win_counts[i] as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_basic() {
        let score = evaluate(2, 3, 1.0);
        assert_eq!(score.wins_a, 2);
        assert_eq!(score.wins_b, 1);
        assert_eq!(score.raw_diff, 1);
        assert_eq!(score.weighted_diff, 1.0);
    }

    #[test]
    fn test_evaluate_weighted() {
        let score = evaluate(0, 3, 1.5);
        assert_eq!(score.raw_diff, 3);
        assert_eq!(score.weighted_diff, 4.5);
    }

    #[test]
    fn test_zero_weight_collapses_score() {
        let score = evaluate(10, 11, 0.0);
        assert_eq!(score.raw_diff, 9);
        assert_eq!(score.weighted_diff, 0.0);
        assert_eq!(score.rank_key(0.0), 0);
    }

    #[test]
    fn test_team_wins() {
        let wins = [2, 0, 1, 0];
        assert_eq!(team_wins(&[0, 1], &wins), 2);
        assert_eq!(team_wins(&[0, 2], &wins), 3);
        assert_eq!(team_wins(&[], &wins), 0);
    }
}
