use crate::core::breaks::current_break_seconds;
use crate::core::calculator::overtime;
use crate::core::clock::current_worked_seconds;
use crate::models::live::LiveState;
use crate::models::session::WorkSession;
use chrono::NaiveDateTime;

pub struct Core;

impl Core {
    /// Display state of an open session at `now`. Pure read, safe on every tick.
    pub fn build_live_state(session: &WorkSession, now: NaiveDateTime) -> LiveState {
        let worked = current_worked_seconds(session, now);
        let ot = overtime::evaluate(worked, session.required_hours, session.shift_end, now);

        LiveState {
            employee_id: session.employee_id.clone(),
            session_id: session.id,
            shift_type: session.shift_type,
            worked_seconds: worked,
            is_on_break: session.is_on_break(),
            current_break_seconds: current_break_seconds(session, now),
            is_overtime: ot.is_overtime,
            overtime_minutes: ot.overtime_minutes(),
            hours_remaining_to_threshold: ot.hours_remaining_to_threshold,
        }
    }
}
