//! Net-worked-time state machine for a single work session.
//!
//! Idle (no session) → Running → OnBreak ⇄ Running → Closed.
//! Worked time is re-derived on every read from `check_in` and the break log.

use crate::core::breaks::{self, total_break_seconds};
use crate::errors::StateError;
use crate::models::session::{BreakInterval, CloseReason, SessionState, WorkSession};
use crate::models::shift::ResolvedShift;
use chrono::NaiveDateTime;
use tracing::warn;

/// Net seconds worked at `now`, never negative.
///
/// Frozen at the break start while on break; pinned to the check-out once closed.
pub fn current_worked_seconds(session: &WorkSession, now: NaiveDateTime) -> i64 {
    let until = match session.state {
        SessionState::Running => now,
        SessionState::OnBreak => session.open_break_start.unwrap_or(now),
        SessionState::Closed => session.check_out.unwrap_or(now),
    };

    ((until - session.check_in).num_seconds() - total_break_seconds(session)).max(0)
}

pub fn worked_hours(session: &WorkSession, now: NaiveDateTime) -> f64 {
    current_worked_seconds(session, now) as f64 / 3600.0
}

/// Open a session. `current` is the employee's latest session, if any.
pub fn check_in(
    current: Option<&WorkSession>,
    employee_id: &str,
    at: NaiveDateTime,
    shift: &ResolvedShift,
) -> Result<WorkSession, StateError> {
    if current.is_some_and(WorkSession::is_open) {
        return Err(StateError::AlreadyCheckedIn(employee_id.to_string()));
    }
    Ok(WorkSession::open(employee_id, at, shift))
}

/// Close a session, ending any break in progress at `at`.
///
/// Breaks are clipped to the close instant; breaks starting at or after it
/// are dropped.
pub fn close(
    session: &WorkSession,
    at: NaiveDateTime,
    reason: CloseReason,
) -> Result<WorkSession, StateError> {
    if !session.is_open() {
        return Err(StateError::SessionClosed(session.id));
    }

    let mut next = if session.is_on_break() {
        breaks::end_break(session, at)?
    } else {
        session.clone()
    };

    if at < session.check_in {
        warn!(
            employee = %session.employee_id,
            check_in = %session.check_in,
            check_out = %at,
            "check-out precedes check-in, clamping"
        );
    }

    let until = at.max(session.check_in);
    next.breaks = next
        .breaks
        .into_iter()
        .filter(|b| b.start < until)
        .map(|b| BreakInterval {
            start: b.start,
            end: b.end.min(until),
        })
        .collect();

    next.check_out = Some(until);
    next.state = SessionState::Closed;
    next.close_reason = Some(reason);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::breaks::{end_break, start_break};
    use crate::core::test_support::{at, resolved_day, running_session};

    #[test]
    fn running_excludes_closed_breaks() {
        let s = running_session(at(9, 5));
        let s = start_break(&s, at(12, 0)).unwrap();
        let s = end_break(&s, at(12, 30)).unwrap();
        assert_eq!(
            current_worked_seconds(&s, at(16, 10)),
            (6 * 60 + 35) * 60
        );
    }

    #[test]
    fn frozen_while_on_break() {
        let s = start_break(&running_session(at(9, 0)), at(11, 0)).unwrap();
        let a = current_worked_seconds(&s, at(11, 1));
        let b = current_worked_seconds(&s, at(23, 59));
        assert_eq!(a, 2 * 3600);
        assert_eq!(a, b);
    }

    #[test]
    fn never_negative_under_skew() {
        let s = running_session(at(9, 0));
        assert_eq!(current_worked_seconds(&s, at(8, 0)), 0);
    }

    #[test]
    fn second_check_in_is_rejected() {
        let s = running_session(at(9, 0));
        let err = check_in(Some(&s), "emp-1", at(10, 0), &resolved_day()).unwrap_err();
        assert_eq!(err, StateError::AlreadyCheckedIn("emp-1".into()));
    }

    #[test]
    fn check_in_after_closed_session_opens_new_one() {
        let s = close(&running_session(at(9, 0)), at(12, 0), CloseReason::CheckOut).unwrap();
        let next = check_in(Some(&s), "emp-1", at(13, 0), &resolved_day()).unwrap();
        assert_eq!(next.state, SessionState::Running);
        assert_eq!(next.id, 0);
    }

    #[test]
    fn close_during_break_ends_the_break() {
        let s = start_break(&running_session(at(9, 0)), at(15, 0)).unwrap();
        let closed = close(&s, at(15, 30), CloseReason::Forced).unwrap();
        assert_eq!(closed.state, SessionState::Closed);
        assert_eq!(closed.breaks.len(), 1);
        assert_eq!(closed.open_break_start, None);
        assert_eq!(closed.close_reason, Some(CloseReason::Forced));
        assert_eq!(current_worked_seconds(&closed, at(23, 0)), 6 * 3600);
    }

    #[test]
    fn close_clips_breaks_past_the_close_instant() {
        use crate::core::test_support::at_on;

        let s = running_session(at_on(2, 20, 0));
        let s = start_break(&s, at_on(3, 3, 30)).unwrap();
        let s = end_break(&s, at_on(3, 4, 30)).unwrap();
        let s = start_break(&s, at_on(3, 5, 0)).unwrap();
        let s = end_break(&s, at_on(3, 5, 30)).unwrap();

        let closed = close(&s, at_on(3, 4, 0), CloseReason::Forced).unwrap();
        assert_eq!(closed.breaks.len(), 1);
        assert_eq!(closed.breaks[0].end, at_on(3, 4, 0));
        assert_eq!(current_worked_seconds(&closed, at_on(3, 9, 0)), (7 * 60 + 30) * 60);
    }

    #[test]
    fn break_after_close_instant_is_dropped() {
        use crate::core::test_support::at_on;

        let s = running_session(at_on(2, 20, 0));
        let s = start_break(&s, at_on(3, 5, 0)).unwrap();
        let s = end_break(&s, at_on(3, 5, 30)).unwrap();

        let closed = close(&s, at_on(3, 4, 0), CloseReason::Forced).unwrap();
        assert!(closed.breaks.is_empty());
        assert!((worked_hours(&closed, at_on(3, 6, 0)) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn closing_twice_is_rejected() {
        let closed = close(&running_session(at(9, 0)), at(12, 0), CloseReason::CheckOut).unwrap();
        assert!(close(&closed, at(13, 0), CloseReason::CheckOut).is_err());
    }
}
