//! Scheduled-vs-actual check-in delay.

use chrono::{NaiveDateTime, NaiveTime};

/// A raw delay above one day means the timestamp belongs to another day.
const WRONG_DAY_MINUTES: i64 = 1440;
/// Credited delay when the wrong-day guard trips.
const WRONG_DAY_CREDIT: i64 = 720;
/// Arrivals this early are treated as belonging to another day.
const EARLY_FLOOR: i64 = -720;

/// Minutes late relative to `scheduled_start`, always >= 0.
pub fn delay_minutes(scheduled_start: NaiveDateTime, actual_check_in: NaiveDateTime) -> i64 {
    let raw = (actual_check_in - scheduled_start).num_minutes();

    if raw > WRONG_DAY_MINUTES {
        WRONG_DAY_CREDIT
    } else if raw < EARLY_FLOOR {
        0
    } else {
        raw.max(0)
    }
}

/// Delay against a shift start time on the check-in's own calendar day.
pub fn delay_on_same_day(start_time: NaiveTime, actual_check_in: NaiveDateTime) -> i64 {
    delay_minutes(actual_check_in.date().and_time(start_time), actual_check_in)
}
