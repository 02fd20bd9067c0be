//! Plain-text table sheets, one per round.

use crate::models::{Roster, Round, Schedule};
use std::fmt::Write;

const HEADERS: [&str; 3] = ["Table", "East-West", "North-South"];

/// Render one round as an aligned text table titled `Round {n}` (`index` is 0-based).
pub fn render_round(round: &Round, index: usize, roster: &Roster) -> String {
    let rows: Vec<[String; 3]> = round
        .tables()
        .map(|(table, pair)| {
            [
                table.to_string(),
                roster.label(&pair.east_west),
                roster.label(&pair.north_south),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Round {}", index + 1);
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

/// All rounds, separated by blank lines.
pub fn render_schedule(schedule: &Schedule, roster: &Roster) -> String {
    schedule
        .rounds
        .iter()
        .enumerate()
        .map(|(i, round)| render_round(round, i, roster))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
