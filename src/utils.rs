use std::str::FromStr;

use rand::{Rng, distr::Alphanumeric};

use crate::types::TimeWindow;

/// Smallest and largest accepted `--top-n` values.
pub const TOP_N_RANGE: std::ops::RangeInclusive<usize> = 5..=20;
pub const DEFAULT_TOP_N: usize = 10;
/// Spotify pages top tracks in at most 50 items.
pub const MAX_LIMIT: u32 = 50;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn parse_time_window(s: &str) -> Result<TimeWindow, String> {
    TimeWindow::from_str(s).map_err(|e| e.to_string())
}

pub fn parse_top_n(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if TOP_N_RANGE.contains(&n) {
        Ok(n)
    } else {
        Err(format!(
            "top-n must be between {} and {}",
            TOP_N_RANGE.start(),
            TOP_N_RANGE.end()
        ))
    }
}

/// Formats milliseconds as `m:ss`.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// First `max` genres joined with commas, for narrow table cells.
pub fn join_genres(genres: &[String], max: usize) -> String {
    genres
        .iter()
        .take(max)
        .cloned()
        .collect::<Vec<_>>()
        .join(",")
}
