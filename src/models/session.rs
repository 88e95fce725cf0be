use super::shift::{ResolutionSource, ResolvedShift, ShiftType};
use crate::utils::date::month_year;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Running,
    OnBreak,
    Closed,
}

impl SessionState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionState::Running => "running",
            SessionState::OnBreak => "on_break",
            SessionState::Closed => "closed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "running" => Some(SessionState::Running),
            "on_break" => Some(SessionState::OnBreak),
            "closed" => Some(SessionState::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloseReason {
    CheckOut,
    /// Closed by the daily boundary monitor.
    Forced,
}

impl CloseReason {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CloseReason::CheckOut => "checkout",
            CloseReason::Forced => "forced",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "checkout" => Some(CloseReason::CheckOut),
            "forced" => Some(CloseReason::Forced),
            _ => None,
        }
    }
}

/// A completed break. Durations are clamped to zero on clock skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BreakInterval {
    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// One employee's check-in to check-out period.
///
/// Worked time is never stored: it is always derived from `check_in` and the
/// break log, so a session read back from storage reports the same value as
/// the one held in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkSession {
    pub id: i64, // 0 = not yet persisted
    pub employee_id: String,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub shift_type: ShiftType,
    pub scheduled_start: NaiveDateTime,
    pub shift_end: NaiveDateTime,
    pub required_hours: f64,
    pub resolution: ResolutionSource,
    pub breaks: Vec<BreakInterval>,
    pub open_break_start: Option<NaiveDateTime>,
    pub state: SessionState,
    pub close_reason: Option<CloseReason>,
    /// True once the closing outcome has been folded into the monthly record.
    pub scored: bool,
}

impl WorkSession {
    /// Fresh running session for a check-in at `at`.
    pub fn open(employee_id: &str, at: NaiveDateTime, shift: &ResolvedShift) -> Self {
        Self {
            id: 0,
            employee_id: employee_id.to_string(),
            check_in: at,
            check_out: None,
            shift_type: shift.shift_type,
            scheduled_start: shift.scheduled_start,
            shift_end: shift.shift_end,
            required_hours: shift.required_hours,
            resolution: shift.source,
            breaks: Vec::new(),
            open_break_start: None,
            state: SessionState::Running,
            close_reason: None,
            scored: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    pub fn is_on_break(&self) -> bool {
        self.state == SessionState::OnBreak
    }

    /// Calendar date the session is credited to.
    pub fn work_date(&self) -> NaiveDate {
        self.check_in.date()
    }

    pub fn month_year(&self) -> String {
        month_year(self.work_date())
    }
}
