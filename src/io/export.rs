//! Schedule persister: CSV (combined or one file per round) and JSON.
//!
//! Only complete schedules reach these functions; a failed run has nothing to write.

use crate::models::{Roster, Round, Schedule};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Errors while writing a schedule.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV export failed: {}", e),
            ExportError::Io(e) => write!(f, "Could not write schedule: {}", e),
            ExportError::Json(e) => write!(f, "JSON export failed: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Csv(e) => Some(e),
            ExportError::Io(e) => Some(e),
            ExportError::Json(e) => Some(e),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

/// One table of one round, as written to CSV.
#[derive(Debug, Serialize)]
struct TableRow<'a> {
    round: usize,
    table: usize,
    east_west: &'a str,
    east_west_members: String,
    north_south: &'a str,
    north_south_members: String,
}

fn members(roster: &Roster, id: &str) -> String {
    roster
        .get(id)
        .map(|t| t.attributes.join(" / "))
        .unwrap_or_default()
}

fn write_round_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    round: &Round,
    index: usize,
    roster: &Roster,
) -> Result<(), ExportError> {
    for (table, pair) in round.tables() {
        writer.serialize(TableRow {
            round: index + 1,
            table,
            east_west: &pair.east_west,
            east_west_members: members(roster, &pair.east_west),
            north_south: &pair.north_south,
            north_south_members: members(roster, &pair.north_south),
        })?;
    }
    Ok(())
}

/// Write every round into one CSV: rounds in order, tables in order.
pub fn write_schedule_csv<W: Write>(output: W, schedule: &Schedule, roster: &Roster) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(output);
    for (i, round) in schedule.rounds.iter().enumerate() {
        write_round_rows(&mut writer, round, i, roster)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `round_1.csv`, `round_2.csv`, ... into `dir` (created if missing).
pub fn write_rounds_to_dir(dir: impl AsRef<Path>, schedule: &Schedule, roster: &Roster) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(schedule.len());
    for (i, round) in schedule.rounds.iter().enumerate() {
        let path = dir.join(format!("round_{}.csv", i + 1));
        let mut writer = csv::Writer::from_path(&path)?;
        write_round_rows(&mut writer, round, i, roster)?;
        writer.flush()?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    log::info!("Wrote {} round sheet(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Pretty-printed JSON of the whole schedule.
pub fn write_schedule_json(path: impl AsRef<Path>, schedule: &Schedule) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, schedule)?;
    out.flush()?;
    Ok(())
}
