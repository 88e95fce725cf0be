//! Calendar helpers: parsing dates and the "YYYY-MM" month keys used by the
//! monthly performance records.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Month key of a date, e.g. `2025-03`.
pub fn month_year(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn month_pattern() -> AppResult<&'static Regex> {
    static RE: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = RE.get() {
        return Ok(re);
    }
    let re = Regex::new(r"^(\d{4})-(0[1-9]|1[0-2])$")?;
    Ok(RE.get_or_init(|| re))
}

/// Validate a `YYYY-MM` key and return its first and last day.
pub fn parse_month(s: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let caps = month_pattern()?
        .captures(s.trim())
        .ok_or_else(|| AppError::InvalidMonth(s.to_string()))?;

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| AppError::InvalidMonth(s.to_string()))?;
    let month: u32 = caps[2]
        .parse()
        .map_err(|_| AppError::InvalidMonth(s.to_string()))?;

    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::InvalidMonth(s.into()))?;
    let last = all_days_of_month(year, month)
        .last()
        .copied()
        .unwrap_or(first);

    Ok((first, last))
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let Some(mut d) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return out;
    };

    while d.month() == month {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(month_year(d), "2025-03");
    }

    #[test]
    fn parse_month_returns_bounds() {
        let (first, last) = parse_month("2024-02").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn month_pattern_is_compiled_once() {
        let a = month_pattern().unwrap();
        let b = month_pattern().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("24-01").is_err());
        assert!(parse_month("2024-01-05").is_err());
    }
}
