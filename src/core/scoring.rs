//! Turn a closed session into its scored outcome.

use crate::core::calculator::delay::delay_on_same_day;
use crate::core::calculator::overtime::overtime_hours;
use crate::core::calculator::score;
use crate::core::clock;
use crate::models::performance::SessionOutcome;
use crate::models::session::{CloseReason, WorkSession};

pub fn outcome_for(session: &WorkSession) -> SessionOutcome {
    let until = session.check_out.unwrap_or(session.check_in);
    let worked_hours = clock::worked_hours(session, until);
    let required_hours = session.required_hours;
    let delay = delay_on_same_day(session.scheduled_start.time(), session.check_in);
    let overtime = overtime_hours(worked_hours, required_hours);

    let delay_score = score::score(delay as f64);
    let punctuality = score::punctuality(delay as f64);
    let work_duration_score = score::work_duration_score(worked_hours, required_hours);
    let final_score = score::final_score(delay as f64, worked_hours, required_hours, overtime);

    SessionOutcome {
        session_id: session.id,
        employee_id: session.employee_id.clone(),
        date: session.work_date(),
        delay_minutes: delay,
        worked_hours,
        required_hours,
        overtime_hours: overtime,
        delay_score,
        punctuality,
        work_duration_score,
        final_score,
        status: score::status(final_score, punctuality),
        forced: session.close_reason == Some(CloseReason::Forced),
    }
}
