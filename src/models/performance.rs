use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl PerformanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PerformanceStatus::Excellent => "excellent",
            PerformanceStatus::Good => "good",
            PerformanceStatus::NeedsImprovement => "needs_improvement",
            PerformanceStatus::Poor => "poor",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "excellent" => Some(PerformanceStatus::Excellent),
            "good" => Some(PerformanceStatus::Good),
            "needs_improvement" => Some(PerformanceStatus::NeedsImprovement),
            "poor" => Some(PerformanceStatus::Poor),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceStatus::Excellent => "Excellent",
            PerformanceStatus::Good => "Good",
            PerformanceStatus::NeedsImprovement => "Needs improvement",
            PerformanceStatus::Poor => "Poor",
        }
    }
}

/// Running monthly aggregate for one employee, keyed by `(employee_id, month_year)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub employee_id: String,
    pub month_year: String, // "YYYY-MM"
    pub total_working_days: u32,
    pub worked_dates: BTreeSet<NaiveDate>,
    pub total_delay_minutes: i64,
    pub total_delay_hours: f64,
    pub total_overtime_hours: f64,
    pub average_performance_score: f64,
    pub punctuality_percentage: f64,
    pub performance_status: PerformanceStatus,
}

impl PerformanceRecord {
    pub fn new(employee_id: &str, month_year: &str) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            month_year: month_year.to_string(),
            total_working_days: 0,
            worked_dates: BTreeSet::new(),
            total_delay_minutes: 0,
            total_delay_hours: 0.0,
            total_overtime_hours: 0.0,
            average_performance_score: 0.0,
            punctuality_percentage: 100.0,
            performance_status: PerformanceStatus::Excellent,
        }
    }
}

/// Scored result of one closed session; the input of the monthly fold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionOutcome {
    pub session_id: i64,
    pub employee_id: String,
    pub date: NaiveDate,
    pub delay_minutes: i64,
    pub worked_hours: f64,
    pub required_hours: f64,
    pub overtime_hours: f64,
    pub delay_score: f64,
    pub punctuality: f64,
    pub work_duration_score: f64,
    pub final_score: f64,
    pub status: PerformanceStatus,
    pub forced: bool,
}
