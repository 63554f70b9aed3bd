use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use super::*;
use crate::roster::{Player, PlayerId, Position};

fn pool_strategy() -> impl Strategy<Value = (usize, Vec<Player>)> {
    (1usize..=4).prop_flat_map(|k| {
        prop::collection::vec((0usize..4, 0u32..6), 2 * k).prop_map(move |slots| {
            let players = slots
                .into_iter()
                .enumerate()
                .map(|(i, (pos, wins))| {
                    Player::new(i as u64 + 1, &format!("P{}", i + 1), Position::ALL[pos], wins)
                })
                .collect();
            (k, players)
        })
    })
}

fn params_strategy(k: usize) -> impl Strategy<Value = BalanceParams> {
    (0..=k, 0..=k, 0..=k, 0.0f64..3.0).prop_map(move |(max_d, min_m, min_f, w)| BalanceParams {
        team_size: k,
        max_defenders: max_d,
        min_midfielders: min_m,
        min_forwards: min_f,
        win_weight: w,
        workers: 1,
    })
}

fn case_strategy() -> impl Strategy<Value = (Vec<Player>, BalanceParams)> {
    pool_strategy().prop_flat_map(|(k, pool)| (Just(pool), params_strategy(k)))
}

fn counts_for(ids: &[PlayerId], pool: &[Player]) -> PositionCounts {
    PositionCounts::from_positions(
        ids.iter()
            .map(|id| pool.iter().find(|p| p.id == *id).unwrap().position),
    )
}

fn run(pool: &[Player], params: &BalanceParams) -> BalanceOutcome {
    balance(pool, params, &NoProgress, &CancellationToken::new())
}

/// First quota-satisfying candidate in enumeration order, by brute force.
fn first_accepted(pool: &[Player], params: &BalanceParams) -> Option<Vec<PlayerId>> {
    Combinations::new(pool.len(), params.team_size)
        .unwrap()
        .map(|idx| idx.iter().map(|&i| pool[i].id).collect::<Vec<_>>())
        .find(|team_a| {
            let rest: Vec<PlayerId> = pool
                .iter()
                .map(|p| p.id)
                .filter(|id| !team_a.contains(id))
                .collect();
            counts_for(team_a, pool).meets_quotas(params) && counts_for(&rest, pool).meets_quotas(params)
        })
}

proptest! {
    #[test]
    fn prop_valid_pool_is_found_or_infeasible((pool, params) in case_strategy()) {
        let outcome = run(&pool, &params);
        prop_assert!(matches!(outcome, BalanceOutcome::Found(_) | BalanceOutcome::NoFeasibleSplit));
        prop_assert_eq!(outcome.found().is_some(), first_accepted(&pool, &params).is_some());
    }

    #[test]
    fn prop_found_is_equal_partition((pool, params) in case_strategy()) {
        if let BalanceOutcome::Found(teams) = run(&pool, &params) {
            let a: HashSet<_> = teams.team_a.iter().copied().collect();
            let b: HashSet<_> = teams.team_b.iter().copied().collect();
            let all: HashSet<_> = pool.iter().map(|p| p.id).collect();
            prop_assert!(a.is_disjoint(&b));
            prop_assert_eq!(a.union(&b).copied().collect::<HashSet<_>>(), all);
            prop_assert_eq!(teams.team_a.len(), params.team_size);
            prop_assert_eq!(teams.team_b.len(), params.team_size);
        }
    }

    #[test]
    fn prop_found_meets_quotas_on_both_sides((pool, params) in case_strategy()) {
        if let BalanceOutcome::Found(teams) = run(&pool, &params) {
            prop_assert!(counts_for(&teams.team_a, &pool).meets_quotas(&params));
            prop_assert!(counts_for(&teams.team_b, &pool).meets_quotas(&params));
        }
    }

    #[test]
    fn prop_zero_weight_picks_first_accepted((pool, params) in case_strategy()) {
        let params = BalanceParams { win_weight: 0.0, ..params };
        let outcome = run(&pool, &params);
        match (outcome, first_accepted(&pool, &params)) {
            (BalanceOutcome::Found(teams), Some(expected)) => {
                prop_assert_eq!(teams.team_a, expected);
                prop_assert_eq!(teams.weighted_diff, 0.0);
            }
            (BalanceOutcome::NoFeasibleSplit, None) => {}
            (other, expected) => prop_assert!(false, "{:?} vs {:?}", other, expected),
        }
    }

    #[test]
    fn prop_weight_scaling_keeps_selection(
        (pool, params) in case_strategy(),
        c in 0.1f64..10.0,
    ) {
        let params = BalanceParams { win_weight: params.win_weight.max(0.1), ..params };
        let scaled = BalanceParams { win_weight: params.win_weight * c, ..params.clone() };
        match (run(&pool, &params), run(&pool, &scaled)) {
            (BalanceOutcome::Found(a), BalanceOutcome::Found(b)) => {
                prop_assert_eq!(&a.team_a, &b.team_a);
                prop_assert_eq!(a.raw_diff, b.raw_diff);
                prop_assert!((b.weighted_diff - a.weighted_diff * c).abs() < 1e-9 * (1.0 + b.weighted_diff));
            }
            (BalanceOutcome::NoFeasibleSplit, BalanceOutcome::NoFeasibleSplit) => {}
            (x, y) => prop_assert!(false, "{:?} vs {:?}", x, y),
        }
    }

    #[test]
    fn prop_visits_every_candidate((pool, params) in case_strategy()) {
        let calls = AtomicU64::new(0);
        let last = AtomicU64::new(0);
        let sink = |p: u64, _t: u64| {
            calls.fetch_add(1, Ordering::Relaxed);
            last.store(p, Ordering::Relaxed);
        };
        balance(&pool, &params, &sink, &CancellationToken::new());
        let total = binomial(pool.len(), params.team_size).unwrap();
        prop_assert_eq!(calls.load(Ordering::Relaxed), total);
        prop_assert_eq!(last.load(Ordering::Relaxed), total);
    }

    #[test]
    fn prop_cancellation_yields_cancelled((pool, params) in case_strategy(), at in 1u64..70) {
        let total = binomial(pool.len(), params.team_size).unwrap();
        let at = at.min(total);
        let token = CancellationToken::new();
        let trigger = token.clone();
        let sink = |p: u64, _t: u64| {
            if p == at {
                trigger.cancel();
            }
        };
        prop_assert_eq!(balance(&pool, &params, &sink, &token), BalanceOutcome::Cancelled);
    }

    #[test]
    fn prop_parallel_matches_sequential((pool, params) in case_strategy(), workers in 2usize..5) {
        let token = CancellationToken::new();
        prop_assert_eq!(
            balance(&pool, &params, &NoProgress, &token),
            balance_parallel(&pool, &params, workers, &NoProgress, &token)
        );
    }
}
