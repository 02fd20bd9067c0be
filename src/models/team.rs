//! Team and Roster data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique identifier for a team (the label printed on the table sheet).
pub type TeamId = String;

/// A team: identifier plus display attributes (e.g. the two players' names).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Shown next to the id on rendered tables; never used for pairing.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl Team {
    /// Create a team with the given id (trimmed). Attributes start empty.
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            id: id.trim().to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// `ID (attr1, attr2)`, or just `ID` when there are no attributes.
    pub fn label(&self) -> String {
        if self.attributes.is_empty() {
            self.id.clone()
        } else {
            format!("{} ({})", self.id, self.attributes.join(", "))
        }
    }
}

/// Ordered list of teams as loaded from the roster source.
///
/// Order is kept so a seeded run over the same roster file is reproducible.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub teams: Vec<Team>,
}

impl Roster {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team identifiers in roster order (the scheduler's input).
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Display label for a team id; falls back to the bare id for unknown teams.
    pub fn label(&self, id: &str) -> String {
        self.get(id).map(Team::label).unwrap_or_else(|| id.to_string())
    }

    /// First identifier that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&TeamId> {
        let mut seen = HashSet::new();
        self.teams.iter().map(|t| &t.id).find(|id| !seen.insert(*id))
    }
}
