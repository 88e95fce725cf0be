//! Counter-based overtime classification.
//!
//! Overtime starts when net worked hours reach the shift's required hours,
//! never because the nominal shift window has elapsed.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvertimeStatus {
    pub worked_hours: f64,
    pub is_overtime: bool,
    pub overtime_hours: f64,
    /// Past shift end but still short of the threshold: hours left to go.
    pub hours_remaining_to_threshold: Option<f64>,
}

impl OvertimeStatus {
    pub fn overtime_minutes(&self) -> i64 {
        (self.overtime_hours * 60.0).floor() as i64
    }
}

pub fn overtime_hours(worked_hours: f64, required_hours: f64) -> f64 {
    (worked_hours - required_hours).max(0.0)
}

pub fn evaluate(
    worked_seconds: i64,
    required_hours: f64,
    shift_end: NaiveDateTime,
    now: NaiveDateTime,
) -> OvertimeStatus {
    let worked_hours = worked_seconds.max(0) as f64 / 3600.0;
    let is_overtime = worked_hours >= required_hours;

    let hours_remaining_to_threshold = if now > shift_end && !is_overtime {
        Some(required_hours - worked_hours)
    } else {
        None
    };

    OvertimeStatus {
        worked_hours,
        is_overtime,
        overtime_hours: overtime_hours(worked_hours, required_hours),
        hours_remaining_to_threshold,
    }
}
