//! Integration tests for the scheduler: coverage, no rematches, seeding, bounds.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use table_scheduler::{
    generate_schedule, CancelToken, InvalidInput, Pair, Schedule, ScheduleBuilder, ScheduleError,
    ScheduleOptions, Strategy, TeamId,
};

fn teams(names: &[&str]) -> Vec<TeamId> {
    names.iter().map(|s| s.to_string()).collect()
}

fn numbered(n: usize) -> Vec<TeamId> {
    (1..=n).map(|i| i.to_string()).collect()
}

/// `(east_west, north_south)` per table per round; unlike `Pair` equality this keeps sides.
fn seats(schedule: &Schedule) -> Vec<Vec<(String, String)>> {
    schedule
        .rounds
        .iter()
        .map(|r| {
            r.pairs
                .iter()
                .map(|p| (p.east_west.clone(), p.north_south.clone()))
                .collect()
        })
        .collect()
}

fn assert_every_team_once_per_round(schedule: &Schedule, teams: &[TeamId]) {
    let expected: HashSet<&str> = teams.iter().map(String::as_str).collect();
    for round in &schedule.rounds {
        assert_eq!(round.len(), teams.len() / 2);
        let seated: Vec<&str> = round
            .pairs
            .iter()
            .flat_map(|p| [p.east_west.as_str(), p.north_south.as_str()])
            .collect();
        let unique: HashSet<&str> = seated.iter().copied().collect();
        assert_eq!(seated.len(), unique.len(), "a team is seated twice");
        assert_eq!(unique, expected);
    }
}

fn assert_rounds_disjoint(schedule: &Schedule) {
    for (i, a) in schedule.rounds.iter().enumerate() {
        for b in schedule.rounds.iter().skip(i + 1) {
            let a: HashSet<&Pair> = a.pairs.iter().collect();
            assert!(b.pairs.iter().all(|p| !a.contains(p)), "rematch between rounds");
        }
    }
    assert!(schedule.has_no_repeats());
}

#[test]
fn four_teams_three_rounds_use_each_pairing_once() {
    let t = teams(&["A", "B", "C", "D"]);
    let mut rng = StdRng::seed_from_u64(42);
    let schedule = generate_schedule(&t, 3, &mut rng).unwrap();
    assert_eq!(schedule.len(), 3);
    assert_every_team_once_per_round(&schedule, &t);
    assert_rounds_disjoint(&schedule);

    let matchings: HashSet<Vec<(String, String)>> = schedule
        .rounds
        .iter()
        .map(|r| {
            let mut m: Vec<(String, String)> = r
                .pairs
                .iter()
                .map(|p| {
                    let (x, y) = p.canonical();
                    (x.to_string(), y.to_string())
                })
                .collect();
            m.sort();
            m
        })
        .collect();
    let all: HashSet<Vec<(String, String)>> = [
        [("A", "B"), ("C", "D")],
        [("A", "C"), ("B", "D")],
        [("A", "D"), ("B", "C")],
    ]
    .iter()
    .map(|m| m.iter().map(|(x, y)| (x.to_string(), y.to_string())).collect())
    .collect();
    assert_eq!(matchings, all);
}

#[test]
fn six_teams_five_rounds_always_succeed() {
    let t = teams(&["A", "B", "C", "D", "E", "F"]);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let schedule = generate_schedule(&t, 5, &mut rng).unwrap();
        assert_eq!(schedule.len(), 5);
        assert_every_team_once_per_round(&schedule, &t);
        assert_rounds_disjoint(&schedule);
        // A full round robin: every team meets every other team exactly once.
        for team in &t {
            let opponents: HashSet<&TeamId> = schedule.opponents_of(team).collect();
            assert_eq!(opponents.len(), 5);
        }
    }
}

#[test]
fn unseeded_run_still_valid() {
    let t = numbered(10);
    let schedule = ScheduleBuilder::new(&t, 4).build().unwrap();
    assert_eq!(schedule.seed, None);
    assert_every_team_once_per_round(&schedule, &t);
    assert_rounds_disjoint(&schedule);
}

#[test]
fn same_seed_same_schedule() {
    let t = numbered(12);
    let opts = ScheduleOptions::default().with_seed(2024);
    let a = ScheduleBuilder::new(&t, 6).options(opts.clone()).build().unwrap();
    let b = ScheduleBuilder::new(&t, 6).options(opts).build().unwrap();
    assert_eq!(seats(&a), seats(&b));
    assert_eq!(a.seed, Some(2024));

    let mut r1 = StdRng::seed_from_u64(5);
    let mut r2 = StdRng::seed_from_u64(5);
    assert_eq!(
        seats(&generate_schedule(&t, 6, &mut r1).unwrap()),
        seats(&generate_schedule(&t, 6, &mut r2).unwrap())
    );
}

#[test]
fn invalid_input_is_rejected_before_generation() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(
        generate_schedule(&numbered(5), 2, &mut rng).unwrap_err(),
        ScheduleError::InvalidInput(InvalidInput::OddTeamCount { count: 5 })
    );
    assert_eq!(
        generate_schedule(&[], 1, &mut rng).unwrap_err(),
        ScheduleError::InvalidInput(InvalidInput::TooFewTeams { count: 0 })
    );
    assert_eq!(
        generate_schedule(&numbered(4), 0, &mut rng).unwrap_err(),
        ScheduleError::InvalidInput(InvalidInput::NoRounds)
    );
    assert_eq!(
        generate_schedule(&teams(&["A", "B", "B", "C"]), 1, &mut rng).unwrap_err(),
        ScheduleError::InvalidInput(InvalidInput::DuplicateTeam("B".to_string()))
    );
}

#[test]
fn too_many_rounds_is_exhausted() {
    let mut rng = StdRng::seed_from_u64(42);
    let err = generate_schedule(&teams(&["A", "B", "C", "D"]), 4, &mut rng).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::ScheduleExhausted {
            teams: 4,
            requested: 4,
            max_rounds: 3
        }
    );
    assert_eq!(err.kind(), "schedule_exhausted");
}

#[test]
fn tiny_budget_hits_retry_limit() {
    let t = numbered(10);
    let opts = ScheduleOptions {
        max_attempts_per_round: 1,
        max_backtracks: 0,
        seed: Some(7),
        time_limit_ms: None,
        round_robin_fallback: false,
    };
    match ScheduleBuilder::new(&t, 9).options(opts).build() {
        Err(ScheduleError::RetryLimitExceeded {
            round,
            attempts,
            backtracks,
            ..
        }) => {
            assert!(round >= 1);
            assert_eq!(attempts, 1);
            assert_eq!(backtracks, 0);
        }
        other => panic!("expected RetryLimitExceeded, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn zero_budget_fails_on_first_round() {
    let t = numbered(4);
    let opts = ScheduleOptions {
        max_attempts_per_round: 0,
        round_robin_fallback: false,
        ..ScheduleOptions::default()
    };
    let err = ScheduleBuilder::new(&t, 1).options(opts).build().unwrap_err();
    assert_eq!(
        err,
        ScheduleError::RetryLimitExceeded {
            round: 0,
            attempts: 0,
            total_attempts: 0,
            backtracks: 0
        }
    );
}

#[test]
fn constrained_budget_recovers_by_backtracking() {
    let t = teams(&["A", "B", "C", "D", "E", "F"]);
    let mut total_backtracks = 0;
    for seed in 0..10 {
        let opts = ScheduleOptions {
            max_attempts_per_round: 2,
            max_backtracks: 10_000,
            seed: Some(seed),
            time_limit_ms: None,
            round_robin_fallback: false,
        };
        let schedule = ScheduleBuilder::new(&t, 5).options(opts).build().unwrap();
        assert_eq!(schedule.strategy, Strategy::RandomSearch);
        assert_every_team_once_per_round(&schedule, &t);
        assert_rounds_disjoint(&schedule);
        total_backtracks += schedule.backtracks;
    }
    assert!(total_backtracks > 0, "two attempts per round never needed a backtrack");
}

#[test]
fn backtrack_budget_is_spent_before_giving_up() {
    let t = numbered(10);
    let opts = ScheduleOptions {
        max_attempts_per_round: 1,
        max_backtracks: 5,
        seed: Some(11),
        time_limit_ms: None,
        round_robin_fallback: false,
    };
    match ScheduleBuilder::new(&t, 9).options(opts).build() {
        Err(ScheduleError::RetryLimitExceeded {
            round,
            attempts,
            backtracks,
            ..
        }) => {
            assert!(round >= 1);
            assert_eq!(attempts, 1);
            assert_eq!(backtracks, 5);
        }
        other => panic!("expected RetryLimitExceeded, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn full_round_robin_falls_back_when_search_stalls() {
    let t = numbered(16);
    let opts = ScheduleOptions {
        max_attempts_per_round: 50,
        max_backtracks: 5,
        seed: Some(3),
        time_limit_ms: None,
        round_robin_fallback: true,
    };
    let schedule = ScheduleBuilder::new(&t, 15).options(opts.clone()).build().unwrap();
    assert_eq!(schedule.strategy, Strategy::RoundRobin);
    assert_eq!(schedule.backtracks, 5);
    assert_eq!(schedule.len(), 15);
    assert_every_team_once_per_round(&schedule, &t);
    assert_rounds_disjoint(&schedule);
    for team in &t {
        assert_eq!(schedule.opponents_of(team).count(), 15);
    }

    let again = ScheduleBuilder::new(&t, 15).options(opts).build().unwrap();
    assert_eq!(seats(&schedule), seats(&again));
}

#[test]
fn large_roster_stops_on_time_limit_without_preallocating() {
    let t = numbered(100_000);
    let opts = ScheduleOptions {
        time_limit_ms: Some(1),
        ..ScheduleOptions::default()
    };
    let err = ScheduleBuilder::new(&t, 99_999).options(opts).build().unwrap_err();
    assert!(
        matches!(
            err,
            ScheduleError::Cancelled { .. } | ScheduleError::RetryLimitExceeded { .. }
        ),
        "unexpected {:?}",
        err
    );
}

#[test]
fn cancelled_run_returns_cancelled() {
    let token = CancelToken::new();
    token.cancel();
    let t = numbered(8);
    let err = ScheduleBuilder::new(&t, 3)
        .cancel_token(token)
        .build()
        .unwrap_err();
    assert_eq!(err, ScheduleError::Cancelled { completed_rounds: 0 });
    assert_eq!(err.kind(), "cancelled");
}

#[test]
fn zero_time_limit_cancels() {
    let t = numbered(8);
    let opts = ScheduleOptions {
        time_limit_ms: Some(0),
        ..ScheduleOptions::default()
    };
    let err = ScheduleBuilder::new(&t, 3).options(opts).build().unwrap_err();
    assert!(matches!(err, ScheduleError::Cancelled { .. }));
}

#[test]
fn pair_equality_ignores_sides() {
    let a = Pair::new("A", "B");
    let b = Pair::new("B", "A");
    assert_eq!(a, b);
    let set: HashSet<Pair> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
    assert_ne!(Pair::new("A", "B"), Pair::new("A", "C"));
}
