use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "day" => Some(ShiftType::Day),
            "night" => Some(ShiftType::Night),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Day => "Day",
            ShiftType::Night => "Night",
        }
    }
}

/// A shift definition. `end_time <= start_time` means the shift ends on the
/// following calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledShift {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_hours: f64,
}

impl ScheduledShift {
    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Day and night definitions in effect for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftCatalog {
    pub day: ScheduledShift,
    pub night: ScheduledShift,
}

impl ShiftCatalog {
    pub fn get(&self, kind: ShiftType) -> &ScheduledShift {
        match kind {
            ShiftType::Day => &self.day,
            ShiftType::Night => &self.night,
        }
    }
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        Self {
            day: ScheduledShift {
                name: "Day".to_string(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
                end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
                required_hours: 7.0,
            },
            night: ScheduledShift {
                name: "Night".to_string(),
                start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
                end_time: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default(),
                required_hours: 8.0,
            },
        }
    }
}

/// Per-date roster entry. `shift_ref = None` with `is_day_off = false` is a
/// partial row and is skipped by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftAssignment {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift_ref: Option<ShiftType>,
    pub is_day_off: bool,
}

/// Where a resolved shift came from, in resolver priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionSource {
    DateAssignment,
    MonthlyAssignment,
    PriorAssignment,
    ClockHeuristic,
    Default,
}

impl ResolutionSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ResolutionSource::DateAssignment => "date",
            ResolutionSource::MonthlyAssignment => "monthly",
            ResolutionSource::PriorAssignment => "prior",
            ResolutionSource::ClockHeuristic => "heuristic",
            ResolutionSource::Default => "default",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "date" => Some(ResolutionSource::DateAssignment),
            "monthly" => Some(ResolutionSource::MonthlyAssignment),
            "prior" => Some(ResolutionSource::PriorAssignment),
            "heuristic" => Some(ResolutionSource::ClockHeuristic),
            "default" => Some(ResolutionSource::Default),
            _ => None,
        }
    }
}

/// Outcome of shift resolution for one check-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedShift {
    pub shift_type: ShiftType,
    pub scheduled_start: NaiveDateTime,
    pub shift_end: NaiveDateTime,
    pub required_hours: f64,
    pub source: ResolutionSource,
    /// Set when a lookup failed or held unusable data; non-fatal.
    pub degraded: bool,
}
