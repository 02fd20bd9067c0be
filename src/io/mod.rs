//! Collaborators around the scheduler: roster input, text rendering, export.

mod export;
mod render;
mod roster;

pub use export::{write_rounds_to_dir, write_schedule_csv, write_schedule_json, ExportError};
pub use render::{render_round, render_schedule};
pub use roster::{read_roster, read_roster_file, roster_from_teams, RosterError};
