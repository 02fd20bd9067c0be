//! Schedule builder: R rounds of random pairings with no rematches.
//!
//! Each round is generate-and-test: a fresh random round is drawn and rejected
//! if any of its tables repeats a matchup from an earlier accepted round. The
//! search is bounded three ways:
//!
//! 1. `rounds > teams - 1` is refused up front (`ScheduleExhausted`).
//! 2. Each round gets `max_attempts_per_round` candidates. When those run out
//!    the last accepted round is dropped and searched again, up to
//!    `max_backtracks` times over the run. After that the run fails with
//!    `RetryLimitExceeded`, or, with `round_robin_fallback` set, all rounds are
//!    rebuilt from a shuffled circle-method round robin. Random search alone
//!    rarely completes a full round robin beyond about 12 teams.
//! 3. A cancel token and an optional time limit are checked between candidates.

use crate::logic::pairing::{shuffle_into_round, validate_teams};
use crate::logic::round_robin::RoundRobinPlan;
use crate::models::{
    InvalidInput, Pair, Round, Schedule, ScheduleError, ScheduleOptions, Strategy, TeamId,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Most rounds `team_count` teams can play without any rematch (a full round robin).
pub fn max_rounds(team_count: usize) -> usize {
    team_count.saturating_sub(1)
}

/// Shared flag for stopping a run from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Rounds found by one strategy, with the search effort spent.
struct Search {
    rounds: Vec<Round>,
    attempts: usize,
    backtracks: usize,
    strategy: Strategy,
}

/// Configured scheduling run over a borrowed team list.
#[derive(Clone, Debug)]
pub struct ScheduleBuilder<'a> {
    teams: &'a [TeamId],
    rounds: usize,
    options: ScheduleOptions,
    cancel: Option<CancelToken>,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(teams: &'a [TeamId], rounds: usize) -> Self {
        Self {
            teams,
            rounds,
            options: ScheduleOptions::default(),
            cancel: None,
        }
    }

    pub fn options(mut self, options: ScheduleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run with a random source seeded from `options.seed`, or from entropy when unset.
    pub fn build(&self) -> Result<Schedule, ScheduleError> {
        match self.options.seed {
            Some(seed) => self.run(&mut StdRng::seed_from_u64(seed), Some(seed)),
            None => self.run(&mut StdRng::from_entropy(), None),
        }
    }

    /// Run with a caller-owned random source; `options.seed` is ignored.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Schedule, ScheduleError> {
        self.run(rng, None)
    }

    fn check_input(&self) -> Result<(), ScheduleError> {
        validate_teams(self.teams)?;
        if self.rounds == 0 {
            return Err(InvalidInput::NoRounds.into());
        }
        let max = max_rounds(self.teams.len());
        if self.rounds > max {
            return Err(ScheduleError::ScheduleExhausted {
                teams: self.teams.len(),
                requested: self.rounds,
                max_rounds: max,
            });
        }
        Ok(())
    }

    fn run<R: Rng + ?Sized>(&self, rng: &mut R, seed: Option<u64>) -> Result<Schedule, ScheduleError> {
        self.check_input()?;

        let deadline = self.options.time_limit().map(|limit| Instant::now() + limit);
        let search = match self.random_search(rng, deadline) {
            Err(ScheduleError::RetryLimitExceeded {
                round,
                total_attempts,
                backtracks,
                ..
            }) if self.options.round_robin_fallback => {
                log::warn!(
                    "Random search stuck at round {} after {} attempts, using round-robin fallback",
                    round + 1,
                    total_attempts
                );
                Search {
                    rounds: self.round_robin(rng, deadline)?,
                    attempts: total_attempts,
                    backtracks,
                    strategy: Strategy::RoundRobin,
                }
            }
            other => other?,
        };

        log::info!(
            "Scheduled {} round(s) for {} teams ({} attempts, {} backtracks, {:?})",
            search.rounds.len(),
            self.teams.len(),
            search.attempts,
            search.backtracks,
            search.strategy
        );

        Ok(Schedule {
            rounds: search.rounds,
            team_count: self.teams.len(),
            seed,
            attempts: search.attempts,
            backtracks: search.backtracks,
            strategy: search.strategy,
            generated_at: Utc::now(),
        })
    }

    /// Generate-and-test with per-round budget and bounded backtracking.
    fn random_search<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        deadline: Option<Instant>,
    ) -> Result<Search, ScheduleError> {
        // Grown per accepted round, never sized from `self.rounds`.
        let mut accepted: Vec<Round> = Vec::new();
        let mut seen: HashSet<Pair> = HashSet::with_capacity(self.teams.len() / 2);
        let mut round_attempts = 0usize;
        let mut total_attempts = 0usize;
        let mut backtracks = 0usize;

        while accepted.len() < self.rounds {
            if self.is_cancelled(deadline) {
                log::warn!("Scheduling cancelled after {} round(s)", accepted.len());
                return Err(ScheduleError::Cancelled {
                    completed_rounds: accepted.len(),
                });
            }

            if round_attempts >= self.options.max_attempts_per_round {
                let round = accepted.len();
                if round == 0 || backtracks >= self.options.max_backtracks {
                    return Err(ScheduleError::RetryLimitExceeded {
                        round,
                        attempts: round_attempts,
                        total_attempts,
                        backtracks,
                    });
                }
                if let Some(dropped) = accepted.pop() {
                    for pair in &dropped.pairs {
                        seen.remove(pair);
                    }
                }
                backtracks += 1;
                round_attempts = 0;
                log::debug!(
                    "Round {} stuck, re-drawing round {} (backtrack {})",
                    round + 1,
                    round,
                    backtracks
                );
                continue;
            }

            round_attempts += 1;
            total_attempts += 1;
            let candidate = shuffle_into_round(self.teams, rng);
            if candidate.pairs.iter().any(|p| seen.contains(p)) {
                continue;
            }

            log::debug!(
                "Round {} accepted after {} attempt(s)",
                accepted.len() + 1,
                round_attempts
            );
            seen.extend(candidate.pairs.iter().cloned());
            accepted.push(candidate);
            round_attempts = 0;
        }

        Ok(Search {
            rounds: accepted,
            attempts: total_attempts,
            backtracks,
            strategy: Strategy::RandomSearch,
        })
    }

    fn round_robin<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        deadline: Option<Instant>,
    ) -> Result<Vec<Round>, ScheduleError> {
        let plan = RoundRobinPlan::shuffled(self.teams, self.rounds, rng);
        let mut rounds = Vec::new();
        for k in 0..plan.len() {
            if self.is_cancelled(deadline) {
                return Err(ScheduleError::Cancelled { completed_rounds: k });
            }
            rounds.push(plan.round(k, rng));
        }
        Ok(rounds)
    }

    fn is_cancelled(&self, deadline: Option<Instant>) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
            || deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Build `rounds` rounds for `teams` with default options and the given random source.
pub fn generate_schedule<R: Rng + ?Sized>(
    teams: &[TeamId],
    rounds: usize,
    rng: &mut R,
) -> Result<Schedule, ScheduleError> {
    ScheduleBuilder::new(teams, rounds).build_with_rng(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_rounds_is_round_robin_length() {
        assert_eq!(max_rounds(0), 0);
        assert_eq!(max_rounds(2), 1);
        assert_eq!(max_rounds(4), 3);
        assert_eq!(max_rounds(6), 5);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
    }
}
