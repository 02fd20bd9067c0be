//! Pairing generator: one random perfect matching of a team set.

use crate::models::{InvalidInput, Pair, Round, ScheduleError, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Check a team list can be seated: at least 2 teams, even count, no duplicates.
pub fn validate_teams(teams: &[TeamId]) -> Result<(), ScheduleError> {
    let count = teams.len();
    if count < 2 {
        return Err(InvalidInput::TooFewTeams { count }.into());
    }
    if count % 2 != 0 {
        return Err(InvalidInput::OddTeamCount { count }.into());
    }
    let mut seen = HashSet::with_capacity(count);
    if let Some(dup) = teams.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(InvalidInput::DuplicateTeam(dup.clone()).into());
    }
    Ok(())
}

/// Generate one random round: shuffle the teams, then seat them two by two.
///
/// The first team of each chunk sits east-west; chunk order is table order.
pub fn generate_round<R: Rng + ?Sized>(teams: &[TeamId], rng: &mut R) -> Result<Round, ScheduleError> {
    validate_teams(teams)?;
    Ok(shuffle_into_round(teams, rng))
}

/// `generate_round` without validation, for callers that validated once up front.
pub(crate) fn shuffle_into_round<R: Rng + ?Sized>(teams: &[TeamId], rng: &mut R) -> Round {
    let mut order: Vec<&TeamId> = teams.iter().collect();
    order.shuffle(rng);
    let pairs = order
        .chunks_exact(2)
        .map(|chunk| Pair::new(chunk[0].clone(), chunk[1].clone()))
        .collect();
    Round::new(pairs)
}
