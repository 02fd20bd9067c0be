//! Roster source: read teams from CSV.
//!
//! Expected layout: a header row, then one team per row. The first column is
//! the team id, every further non-blank column is a display attribute.
//!
//! ```text
//! team,player_1,player_2
//! 1,Zhang,Li
//! 2,Wang,Zhao
//! ```

use crate::models::{Roster, Team, TeamId};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Errors while loading a roster.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    /// A data row has an empty team id. `line` is 1-based and counts the header.
    BlankTeamId { line: u64 },
    /// A team in a list (e.g. a JSON body) has an empty id. `index` is 0-based.
    UnnamedTeam { index: usize },
    DuplicateTeam(TeamId),
    Empty,
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Could not read roster: {}", e),
            RosterError::BlankTeamId { line } => write!(f, "Roster line {} has no team id", line),
            RosterError::UnnamedTeam { index } => write!(f, "Team #{} has no id", index + 1),
            RosterError::DuplicateTeam(id) => write!(f, "Team '{}' is listed more than once", id),
            RosterError::Empty => write!(f, "Roster has no teams"),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

/// Load a roster CSV file.
pub fn read_roster_file(path: impl AsRef<Path>) -> Result<Roster, RosterError> {
    let path = path.as_ref();
    log::debug!("Reading roster from {}", path.display());
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    roster_from_csv(reader)
}

/// Load a roster from any CSV source (header row required).
pub fn read_roster<R: Read>(input: R) -> Result<Roster, RosterError> {
    let reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);
    roster_from_csv(reader)
}

fn roster_from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Roster, RosterError> {
    let mut teams = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let id = record.get(0).unwrap_or_default();
        if id.is_empty() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(RosterError::BlankTeamId { line });
        }
        let attributes: Vec<&str> = record.iter().skip(1).filter(|s| !s.is_empty()).collect();
        teams.push(Team::new(id).with_attributes(attributes));
    }
    roster_from_teams(teams)
}

/// Check a team list for emptiness, blank ids and duplicates.
///
/// Team-count parity is left to the scheduler, which reports it as invalid input.
pub fn roster_from_teams(teams: Vec<Team>) -> Result<Roster, RosterError> {
    if teams.is_empty() {
        return Err(RosterError::Empty);
    }
    if let Some(index) = teams.iter().position(|t| t.id.trim().is_empty()) {
        return Err(RosterError::UnnamedTeam { index });
    }
    let roster = Roster::new(teams);
    if let Some(dup) = roster.first_duplicate() {
        return Err(RosterError::DuplicateTeam(dup.clone()));
    }
    log::info!("Loaded roster with {} team(s)", roster.len());
    Ok(roster)
}
