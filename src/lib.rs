//! Guandan table scheduler: random pairings per round with no rematches.

pub mod io;
pub mod logic;
pub mod models;

pub use io::{
    read_roster, read_roster_file, render_round, render_schedule, roster_from_teams,
    write_rounds_to_dir, write_schedule_csv, write_schedule_json, ExportError, RosterError,
};
pub use logic::{
    generate_round, generate_schedule, max_rounds, validate_teams, CancelToken, ScheduleBuilder,
};
pub use models::{
    InvalidInput, Pair, Roster, Round, Schedule, ScheduleError, ScheduleOptions, Strategy, Team,
    TeamId,
};
