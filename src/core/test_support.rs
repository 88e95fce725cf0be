//! Shared fixtures for the core unit tests.

use crate::models::session::WorkSession;
use crate::models::shift::{ResolutionSource, ResolvedShift, ShiftType};
use chrono::{NaiveDate, NaiveDateTime};

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

pub fn at_on(d: u32, h: u32, m: u32) -> NaiveDateTime {
    day(d).and_hms_opt(h, m, 0).unwrap()
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    at_on(2, h, m)
}

pub fn resolved_day() -> ResolvedShift {
    ResolvedShift {
        shift_type: ShiftType::Day,
        scheduled_start: at(9, 0),
        shift_end: at(16, 0),
        required_hours: 7.0,
        source: ResolutionSource::DateAssignment,
        degraded: false,
    }
}

pub fn running_session(check_in: NaiveDateTime) -> WorkSession {
    WorkSession::open("emp-1", check_in, &resolved_day())
}
