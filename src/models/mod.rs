//! Data structures for the table scheduler: teams, tables, rounds, schedules.

mod options;
mod round;
mod schedule;
mod team;

pub use options::ScheduleOptions;
pub use round::{Pair, Round};
pub use schedule::{InvalidInput, Schedule, ScheduleError, Strategy};
pub use team::{Roster, Team, TeamId};
