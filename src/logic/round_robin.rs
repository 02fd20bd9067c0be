//! Circle-method round robin with random relabelling.
//!
//! One team stays fixed while the others rotate; round `r` pairs the fixed
//! team with `rest[r]` and `rest[r + i]` with `rest[r - i]` (mod n-1). Over the
//! n-1 rounds every pair meets exactly once, so any subset of rounds is free of
//! rematches.

use crate::models::{Pair, Round, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pairs of circle round `r` over `order` (even length, at least 2).
fn circle_round<'a>(order: &[&'a TeamId], r: usize) -> Vec<(&'a TeamId, &'a TeamId)> {
    let m = order.len() - 1;
    let rest = &order[1..];
    let mut pairs = Vec::with_capacity(order.len() / 2);
    pairs.push((order[0], rest[r % m]));
    for i in 1..order.len() / 2 {
        pairs.push((rest[(r + i) % m], rest[(r + m - i) % m]));
    }
    pairs
}

/// A shuffled team order plus a random choice of which circle rounds to play.
pub(crate) struct RoundRobinPlan<'a> {
    order: Vec<&'a TeamId>,
    picks: Vec<usize>,
}

impl<'a> RoundRobinPlan<'a> {
    /// `teams` must already be validated; `rounds` must not exceed `teams.len() - 1`.
    pub(crate) fn shuffled<R: Rng + ?Sized>(teams: &'a [TeamId], rounds: usize, rng: &mut R) -> Self {
        let mut order: Vec<&TeamId> = teams.iter().collect();
        order.shuffle(rng);
        let mut picks: Vec<usize> = (0..teams.len().saturating_sub(1)).collect();
        picks.shuffle(rng);
        picks.truncate(rounds);
        Self { order, picks }
    }

    pub(crate) fn len(&self) -> usize {
        self.picks.len()
    }

    /// Round `k` of the plan, with random sides and table order.
    pub(crate) fn round<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Round {
        let mut pairs: Vec<Pair> = circle_round(&self.order, self.picks[k])
            .into_iter()
            .map(|(a, b)| {
                if rng.gen_bool(0.5) {
                    Pair::new(a.clone(), b.clone())
                } else {
                    Pair::new(b.clone(), a.clone())
                }
            })
            .collect();
        pairs.shuffle(rng);
        Round::new(pairs)
    }
}
