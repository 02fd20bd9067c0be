//! Tuning knobs for a scheduling run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search budget and seeding for `ScheduleBuilder`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    /// Candidates tried for one round before backtracking.
    #[serde(default = "default_max_attempts_per_round")]
    pub max_attempts_per_round: usize,
    /// Accepted rounds that may be dropped and searched again over the whole run.
    #[serde(default = "default_max_backtracks")]
    pub max_backtracks: usize,
    /// Seed for the run's random source. None means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Wall-clock limit for the whole run, in milliseconds.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    /// When random search gives up, build the rounds from a shuffled circle-method
    /// round robin instead of failing with `RetryLimitExceeded`.
    #[serde(default = "default_round_robin_fallback")]
    pub round_robin_fallback: bool,
}

fn default_max_attempts_per_round() -> usize {
    10_000
}

fn default_max_backtracks() -> usize {
    256
}

fn default_round_robin_fallback() -> bool {
    true
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            max_attempts_per_round: default_max_attempts_per_round(),
            max_backtracks: default_max_backtracks(),
            seed: None,
            time_limit_ms: None,
            round_robin_fallback: default_round_robin_fallback(),
        }
    }
}

impl ScheduleOptions {
    /// Defaults overridden by `SCHEDULE_MAX_ATTEMPTS`, `SCHEDULE_MAX_BACKTRACKS`,
    /// `SCHEDULE_SEED`, `SCHEDULE_TIME_LIMIT_MS` and `SCHEDULE_ROUND_ROBIN_FALLBACK`
    /// when set and parseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = Self::default();
        Self {
            max_attempts_per_round: parse("SCHEDULE_MAX_ATTEMPTS")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_attempts_per_round),
            max_backtracks: parse("SCHEDULE_MAX_BACKTRACKS")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_backtracks),
            seed: parse("SCHEDULE_SEED"),
            time_limit_ms: parse("SCHEDULE_TIME_LIMIT_MS"),
            round_robin_fallback: lookup("SCHEDULE_ROUND_ROBIN_FALLBACK")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.round_robin_fallback),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}
