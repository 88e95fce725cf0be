//! Break log for a work session.
//!
//! Transitions take the current session by reference and return the next
//! one, so a rejected event leaves the caller's copy untouched.

use crate::errors::StateError;
use crate::models::session::{BreakInterval, SessionState, WorkSession};
use chrono::NaiveDateTime;

pub fn start_break(session: &WorkSession, now: NaiveDateTime) -> Result<WorkSession, StateError> {
    match session.state {
        SessionState::Closed => Err(StateError::NoOpenSession(session.employee_id.clone())),
        SessionState::OnBreak => Err(StateError::AlreadyOnBreak(session.employee_id.clone())),
        SessionState::Running => {
            let mut next = session.clone();
            next.open_break_start = Some(now.max(session.check_in));
            next.state = SessionState::OnBreak;
            Ok(next)
        }
    }
}

pub fn end_break(session: &WorkSession, now: NaiveDateTime) -> Result<WorkSession, StateError> {
    if session.state == SessionState::Closed {
        return Err(StateError::NoOpenSession(session.employee_id.clone()));
    }

    let Some(start) = session.open_break_start.filter(|_| session.is_on_break()) else {
        return Err(StateError::NotOnBreak(session.employee_id.clone()));
    };

    let mut next = session.clone();
    next.breaks.push(BreakInterval {
        start,
        end: now.max(start),
    });
    next.open_break_start = None;
    next.state = SessionState::Running;
    Ok(next)
}

/// Sum of completed breaks only.
pub fn total_break_seconds(session: &WorkSession) -> i64 {
    session.breaks.iter().map(BreakInterval::seconds).sum()
}

/// Length of the break in progress, 0 when not on break.
pub fn current_break_seconds(session: &WorkSession, now: NaiveDateTime) -> i64 {
    match session.open_break_start {
        Some(start) if session.is_on_break() => (now - start).num_seconds().max(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{at, running_session};

    #[test]
    fn break_cycle_records_interval() {
        let s = running_session(at(9, 0));
        let s = start_break(&s, at(12, 0)).unwrap();
        assert_eq!(s.state, SessionState::OnBreak);
        assert_eq!(current_break_seconds(&s, at(12, 10)), 600);
        assert_eq!(total_break_seconds(&s), 0);

        let s = end_break(&s, at(12, 30)).unwrap();
        assert_eq!(s.state, SessionState::Running);
        assert_eq!(s.breaks.len(), 1);
        assert_eq!(total_break_seconds(&s), 1800);
        assert_eq!(current_break_seconds(&s, at(13, 0)), 0);
    }

    #[test]
    fn total_is_sum_of_completed_cycles() {
        let mut s = running_session(at(8, 0));
        let cycles = [(9, 0, 9, 10), (11, 0, 11, 45), (14, 5, 14, 20)];
        for (sh, sm, eh, em) in cycles {
            s = start_break(&s, at(sh, sm)).unwrap();
            s = end_break(&s, at(eh, em)).unwrap();
        }
        assert_eq!(total_break_seconds(&s), (10 + 45 + 15) * 60);
    }

    #[test]
    fn double_start_is_rejected() {
        let s = start_break(&running_session(at(9, 0)), at(10, 0)).unwrap();
        let err = start_break(&s, at(10, 5)).unwrap_err();
        assert_eq!(err, StateError::AlreadyOnBreak("emp-1".into()));
        assert_eq!(s.open_break_start, Some(at(10, 0)));
    }

    #[test]
    fn ending_unstarted_break_is_rejected() {
        let s = running_session(at(9, 0));
        let err = end_break(&s, at(10, 0)).unwrap_err();
        assert_eq!(err, StateError::NotOnBreak("emp-1".into()));
        assert!(s.breaks.is_empty());
    }

    #[test]
    fn skewed_end_is_clamped() {
        let s = start_break(&running_session(at(9, 0)), at(12, 0)).unwrap();
        let s = end_break(&s, at(11, 50)).unwrap();
        assert_eq!(total_break_seconds(&s), 0);
    }
}
