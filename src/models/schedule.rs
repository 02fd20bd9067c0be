//! Schedule and ScheduleError.

use crate::models::round::{Pair, Round};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Why the scheduler refused its input before generating anything.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidInput {
    /// Pairing needs an even number of teams (no byes).
    OddTeamCount { count: usize },
    /// Need at least 2 teams.
    TooFewTeams { count: usize },
    /// The same team id appears twice.
    DuplicateTeam(TeamId),
    /// Round count must be at least 1.
    NoRounds,
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::OddTeamCount { count } => {
                write!(f, "Team count must be even to seat every team (got {})", count)
            }
            InvalidInput::TooFewTeams { count } => {
                write!(f, "Need at least 2 teams (got {})", count)
            }
            InvalidInput::DuplicateTeam(id) => write!(f, "Team '{}' appears more than once", id),
            InvalidInput::NoRounds => write!(f, "Round count must be at least 1"),
        }
    }
}

/// Errors returned by the scheduler. A failed run never yields a partial schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    InvalidInput(InvalidInput),
    /// More rounds requested than `teams - 1`, the most rounds possible without a rematch.
    ScheduleExhausted {
        teams: usize,
        requested: usize,
        max_rounds: usize,
    },
    /// The candidate search for `round` (0-based) ran out of budget.
    RetryLimitExceeded {
        round: usize,
        attempts: usize,
        total_attempts: usize,
        backtracks: usize,
    },
    /// Cancel token tripped or time limit reached.
    Cancelled { completed_rounds: usize },
}

impl ScheduleError {
    /// Stable machine-readable kind, used by the CLI and the web API.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InvalidInput(_) => "invalid_input",
            ScheduleError::ScheduleExhausted { .. } => "schedule_exhausted",
            ScheduleError::RetryLimitExceeded { .. } => "retry_limit_exceeded",
            ScheduleError::Cancelled { .. } => "cancelled",
        }
    }
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidInput(reason) => write!(f, "Invalid input: {}", reason),
            ScheduleError::ScheduleExhausted {
                teams,
                requested,
                max_rounds,
            } => write!(
                f,
                "{} teams allow at most {} rounds without a rematch ({} requested); lower the round count",
                teams, max_rounds, requested
            ),
            ScheduleError::RetryLimitExceeded {
                round,
                attempts,
                total_attempts,
                backtracks,
            } => write!(
                f,
                "No valid pairing found for round {} after {} attempts ({} total, {} backtracks); \
                 try fewer rounds or enable the round-robin fallback",
                round + 1,
                attempts,
                total_attempts,
                backtracks
            ),
            ScheduleError::Cancelled { completed_rounds } => {
                write!(f, "Scheduling cancelled after {} completed round(s)", completed_rounds)
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<InvalidInput> for ScheduleError {
    fn from(reason: InvalidInput) -> Self {
        ScheduleError::InvalidInput(reason)
    }
}

/// How the rounds of a schedule were found.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Generate-and-test over random rounds.
    #[default]
    RandomSearch,
    /// Shuffled circle-method round robin, after random search ran out of budget.
    RoundRobin,
}

/// The finished schedule: `rounds[k]` is round `k + 1`. Not mutated once built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub rounds: Vec<Round>,
    pub team_count: usize,
    /// Seed of the random source, when the run was seeded.
    pub seed: Option<u64>,
    /// Candidates generated across the whole run, rejected ones included.
    pub attempts: usize,
    pub backtracks: usize,
    #[serde(default)]
    pub strategy: Strategy,
    pub generated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// All pairs across all rounds, in schedule then table order.
    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.rounds.iter().flat_map(|r| r.pairs.iter())
    }

    /// True if no unordered pair occurs in more than one round.
    pub fn has_no_repeats(&self) -> bool {
        let mut seen = HashSet::new();
        self.pairs().all(|p| seen.insert(p))
    }

    /// Opponents of `team`, in round order.
    pub fn opponents_of<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a TeamId> + 'a {
        self.pairs().filter_map(move |p| {
            if p.east_west == team {
                Some(&p.north_south)
            } else if p.north_south == team {
                Some(&p.east_west)
            } else {
                None
            }
        })
    }
}
