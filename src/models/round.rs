//! Pair (one table) and Round (one full set of tables).

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Two teams seated at one table.
///
/// Sides are kept for display (east-west sits first), but equality and
/// hashing ignore them: `(a, b) == (b, a)`. Repeat detection relies on this.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pair {
    pub east_west: TeamId,
    pub north_south: TeamId,
}

impl Pair {
    pub fn new(east_west: impl Into<TeamId>, north_south: impl Into<TeamId>) -> Self {
        Self {
            east_west: east_west.into(),
            north_south: north_south.into(),
        }
    }

    /// Both ids, smaller first.
    pub fn canonical(&self) -> (&str, &str) {
        if self.east_west <= self.north_south {
            (self.east_west.as_str(), self.north_south.as_str())
        } else {
            (self.north_south.as_str(), self.east_west.as_str())
        }
    }

    pub fn contains(&self, team: &str) -> bool {
        self.east_west == team || self.north_south == team
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// A complete matching for one round. `pairs[i]` is table `i + 1`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub pairs: Vec<Pair>,
}

impl Round {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Tables with their 1-based numbers.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &Pair)> {
        self.pairs.iter().enumerate().map(|(i, p)| (i + 1, p))
    }

    /// Table number (1-based) at which `team` plays this round.
    pub fn table_of(&self, team: &str) -> Option<usize> {
        self.tables().find(|(_, p)| p.contains(team)).map(|(n, _)| n)
    }
}
