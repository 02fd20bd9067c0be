//! Scheduling logic: single-round pairing and the multi-round builder.

mod builder;
mod pairing;
mod round_robin;

pub use builder::{generate_schedule, max_rounds, CancelToken, ScheduleBuilder};
pub use pairing::{generate_round, validate_teams};
