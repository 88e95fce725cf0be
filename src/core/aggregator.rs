//! Monthly per-employee fold of session outcomes.

use crate::core::calculator::score::{aggregate_punctuality, round2, status};
use crate::models::performance::{PerformanceRecord, SessionOutcome};

/// Fold one outcome into the running record for its month.
///
/// A calendar date is counted once no matter how many sessions land on it;
/// the running average uses the day count after that decision.
pub fn fold(mut record: PerformanceRecord, outcome: &SessionOutcome) -> PerformanceRecord {
    if record.worked_dates.insert(outcome.date) {
        record.total_working_days += 1;
    }

    let n = record.total_working_days.max(1) as f64;
    record.average_performance_score =
        (record.average_performance_score * (n - 1.0) + outcome.final_score) / n;

    record.total_delay_minutes += outcome.delay_minutes.max(0);
    record.total_delay_hours = round2(record.total_delay_minutes as f64 / 60.0);
    record.total_overtime_hours += outcome.overtime_hours.max(0.0);

    record.punctuality_percentage =
        aggregate_punctuality(record.total_delay_minutes, record.total_working_days);
    record.performance_status = status(
        record.average_performance_score,
        record.punctuality_percentage,
    );

    record
}

/// Rebuild a month from scratch, oldest outcome first.
pub fn replay<'a, I>(employee_id: &str, month_year: &str, outcomes: I) -> PerformanceRecord
where
    I: IntoIterator<Item = &'a SessionOutcome>,
{
    outcomes
        .into_iter()
        .fold(PerformanceRecord::new(employee_id, month_year), fold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::day;
    use crate::models::performance::PerformanceStatus;

    fn outcome(d: u32, delay: i64, final_score: f64, overtime: f64) -> SessionOutcome {
        SessionOutcome {
            session_id: d as i64,
            employee_id: "emp-1".into(),
            date: day(d),
            delay_minutes: delay,
            worked_hours: 7.0,
            required_hours: 7.0,
            overtime_hours: overtime,
            delay_score: 100.0,
            punctuality: 100.0,
            work_duration_score: 100.0,
            final_score,
            status: PerformanceStatus::Excellent,
            forced: false,
        }
    }

    #[test]
    fn same_date_counts_once() {
        let r = PerformanceRecord::new("emp-1", "2025-06");
        let r = fold(r, &outcome(2, 0, 90.0, 0.0));
        let r = fold(r, &outcome(2, 0, 80.0, 0.0));

        assert_eq!(r.total_working_days, 1);
        assert_eq!(r.worked_dates.len(), 1);
        // n stays 1: the second event replaces the average
        assert_eq!(r.average_performance_score, 80.0);
    }

    #[test]
    fn running_average_over_days() {
        let r = replay(
            "emp-1",
            "2025-06",
            &[
                outcome(2, 0, 90.0, 0.0),
                outcome(3, 0, 80.0, 1.5),
                outcome(4, 0, 100.0, 0.5),
            ],
        );
        assert_eq!(r.total_working_days, 3);
        assert!((r.average_performance_score - 90.0).abs() < 1e-9);
        assert_eq!(r.total_overtime_hours, 2.0);
        assert_eq!(r.performance_status, PerformanceStatus::Excellent);
    }

    #[test]
    fn delay_totals_drive_punctuality() {
        let r = replay(
            "emp-1",
            "2025-06",
            &[outcome(2, 20, 88.0, 0.0), outcome(3, 0, 96.0, 0.0)],
        );
        assert_eq!(r.total_delay_minutes, 20);
        assert_eq!(r.total_delay_hours, 0.33);
        // 10 minutes per day on average → 90 - 30
        assert_eq!(r.punctuality_percentage, 60.0);
        assert_eq!(r.performance_status, PerformanceStatus::NeedsImprovement);
    }

    #[test]
    fn negative_contributions_are_ignored() {
        let r = fold(
            PerformanceRecord::new("emp-1", "2025-06"),
            &outcome(2, -15, 90.0, -1.0),
        );
        assert_eq!(r.total_delay_minutes, 0);
        assert_eq!(r.total_overtime_hours, 0.0);
    }

    #[test]
    fn working_days_never_exceed_dates() {
        let mut r = PerformanceRecord::new("emp-1", "2025-06");
        for (d, s) in [(2, 70.0), (2, 75.0), (5, 60.0), (9, 99.0), (9, 10.0)] {
            r = fold(r, &outcome(d, 5, s, 0.0));
            assert!(r.total_working_days as usize <= r.worked_dates.len());
        }
        assert_eq!(r.total_working_days as usize, r.worked_dates.len());
    }
}
