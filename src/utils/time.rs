//! Time utilities: parsing HH:MM and event timestamps, formatting durations.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse an event timestamp given as `YYYY-MM-DD HH:MM` (seconds optional).
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// Event time from `--at`, or the local wall clock.
pub fn parse_optional_at(input: Option<&String>) -> AppResult<NaiveDateTime> {
    match input {
        Some(s) => parse_datetime(s),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// Storage format for timestamps in SQLite.
pub fn to_db_str(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn from_db_str(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}
