//! Pure performance-scoring formulas.
//!
//! Delays are in minutes, durations in hours. All scores live in `0..=100`.

use crate::models::performance::PerformanceStatus;

const MAX_SCORE: f64 = 100.0;
/// Delay at which the delay score reaches zero.
const DELAY_SCORE_CUTOFF: f64 = 500.0;
const PUNCTUALITY_CUTOFF: f64 = 60.0;
const PUNCTUALITY_SEVERE: f64 = 30.0;
/// Points lost per missing hour in the duration score.
const MISSING_HOUR_PENALTY: f64 = 15.0;
/// Overtime bonus: points per hour, capped.
const OVERTIME_POINTS_PER_HOUR: f64 = 2.0;
const OVERTIME_BONUS_CAP: f64 = 10.0;

const DELAY_WEIGHT: f64 = 0.6;
const DURATION_WEIGHT: f64 = 0.3;

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Delay score: linear from 100 at on-time down to 0 at 500 minutes.
pub fn score(delay: f64) -> f64 {
    if delay <= 0.0 {
        MAX_SCORE
    } else if delay >= DELAY_SCORE_CUTOFF {
        0.0
    } else {
        round2(MAX_SCORE - delay / 5.0)
    }
}

/// Punctuality drops steeply: nothing is left after an hour.
pub fn punctuality(delay: f64) -> f64 {
    if delay <= 0.0 {
        MAX_SCORE
    } else if delay >= PUNCTUALITY_CUTOFF {
        0.0
    } else if delay > PUNCTUALITY_SEVERE {
        (50.0 - 2.0 * delay).max(0.0)
    } else {
        (90.0 - 3.0 * delay).max(0.0)
    }
}

/// Punctuality of a month, from the cumulative delay spread over the days worked.
pub fn aggregate_punctuality(total_delay_minutes: i64, working_days: u32) -> f64 {
    if working_days == 0 {
        return MAX_SCORE;
    }
    round2(punctuality(total_delay_minutes.max(0) as f64 / working_days as f64))
}

pub fn work_duration_score(actual_hours: f64, expected_hours: f64) -> f64 {
    if actual_hours >= expected_hours {
        MAX_SCORE
    } else if actual_hours <= 0.0 {
        0.0
    } else {
        (MAX_SCORE - MISSING_HOUR_PENALTY * (expected_hours - actual_hours)).max(0.0)
    }
}

pub fn final_score(delay: f64, actual_hours: f64, expected_hours: f64, overtime_hours: f64) -> f64 {
    let bonus = (OVERTIME_POINTS_PER_HOUR * overtime_hours.max(0.0)).min(OVERTIME_BONUS_CAP);
    let weighted = DELAY_WEIGHT * score(delay)
        + DURATION_WEIGHT * work_duration_score(actual_hours, expected_hours)
        + bonus;
    round2(weighted.min(MAX_SCORE))
}

/// Canonical status rule: the weaker of the two scores decides.
pub fn status(final_score: f64, punctuality: f64) -> PerformanceStatus {
    let weakest = final_score.min(punctuality);
    if weakest < 50.0 {
        PerformanceStatus::Poor
    } else if weakest < 70.0 {
        PerformanceStatus::NeedsImprovement
    } else if weakest < 85.0 {
        PerformanceStatus::Good
    } else {
        PerformanceStatus::Excellent
    }
}
