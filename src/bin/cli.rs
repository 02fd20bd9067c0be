//! Command-line front end: read a roster CSV, build the schedule, print and export it.
//! Run with: cargo run --bin table-scheduler -- --roster teams.csv --rounds 5
//! Logging follows `RUST_LOG` (default `info`).

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use table_scheduler::{
    read_roster_file, render_schedule, write_rounds_to_dir, write_schedule_csv, write_schedule_json,
    ScheduleBuilder, ScheduleOptions,
};

/// Command-line arguments for `table-scheduler`.
#[derive(Debug, Parser)]
#[command(
    name = "table-scheduler",
    version,
    about = "Seat teams at tables for several rounds without any rematch.",
    long_about = None
)]
struct CliArgs {
    /// Roster CSV: header row, team id in the first column, display attributes after it.
    #[arg(long, value_name = "PATH")]
    roster: PathBuf,

    /// Number of rounds to schedule.
    #[arg(long, value_name = "N")]
    rounds: usize,

    /// Seed for a reproducible schedule (overrides SCHEDULE_SEED).
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Candidates tried per round before backtracking (overrides SCHEDULE_MAX_ATTEMPTS).
    #[arg(long, value_name = "N")]
    max_attempts: Option<usize>,

    /// Backtracks allowed over the whole run (overrides SCHEDULE_MAX_BACKTRACKS).
    #[arg(long, value_name = "N")]
    max_backtracks: Option<usize>,

    /// Give up after this many milliseconds (overrides SCHEDULE_TIME_LIMIT_MS).
    #[arg(long, value_name = "MS")]
    time_limit_ms: Option<u64>,

    /// Fail instead of falling back to a shuffled round robin when random search gives up.
    #[arg(long)]
    no_fallback: bool,

    /// Write one CSV per round into this directory.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Write the combined schedule CSV here.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write the schedule as JSON here.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Print the table sheets to stdout.
    #[arg(long)]
    print: bool,
}

impl CliArgs {
    fn options(&self) -> ScheduleOptions {
        let mut options = ScheduleOptions::from_env();
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if let Some(n) = self.max_attempts {
            options.max_attempts_per_round = n;
        }
        if let Some(n) = self.max_backtracks {
            options.max_backtracks = n;
        }
        if let Some(ms) = self.time_limit_ms {
            options.time_limit_ms = Some(ms);
        }
        if self.no_fallback {
            options.round_robin_fallback = false;
        }
        options
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let roster = read_roster_file(&args.roster)?;
    let teams = roster.team_ids();
    let schedule = ScheduleBuilder::new(&teams, args.rounds)
        .options(args.options())
        .build()?;

    if args.print || (args.out_dir.is_none() && args.csv.is_none() && args.json.is_none()) {
        println!("{}", render_schedule(&schedule, &roster));
    }
    if let Some(dir) = &args.out_dir {
        write_rounds_to_dir(dir, &schedule, &roster)?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path)?;
        write_schedule_csv(file, &schedule, &roster)?;
        log::info!("Schedule summary saved to {}", path.display());
    }
    if let Some(path) = &args.json {
        write_schedule_json(path, &schedule)?;
        log::info!("Schedule JSON saved to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e
                .downcast_ref::<table_scheduler::ScheduleError>()
                .map(|se| se.kind())
                .unwrap_or("error");
            eprintln!("{}: {}", kind, e);
            ExitCode::FAILURE
        }
    }
}
