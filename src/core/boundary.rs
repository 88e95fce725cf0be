//! Daily forced-close boundary.
//!
//! Once a day, at a configured hour, every session still open is closed at
//! the boundary instant, whatever its overtime or break state.

use crate::errors::{AppError, AppResult};
use crate::models::session::WorkSession;
use chrono::{Days, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryMonitor {
    at: NaiveTime,
}

impl BoundaryMonitor {
    pub fn new(hour: u32) -> AppResult<Self> {
        let at = NaiveTime::from_hms_opt(hour, 0, 0)
            .ok_or_else(|| AppError::Config(format!("boundary_hour out of range: {hour}")))?;
        Ok(Self { at })
    }

    /// Most recent boundary instant at or before `now`.
    pub fn latest_boundary(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today <= now {
            today
        } else {
            today.checked_sub_days(Days::new(1)).unwrap_or(today)
        }
    }

    /// First boundary instant strictly after `now`.
    pub fn next_boundary(&self, now: NaiveDateTime) -> NaiveDateTime {
        let latest = self.latest_boundary(now);
        latest.checked_add_days(Days::new(1)).unwrap_or(latest)
    }

    /// Where a forced close pins `session`: the first boundary after check-in.
    pub fn closing_instant(&self, session: &WorkSession) -> NaiveDateTime {
        self.next_boundary(session.check_in)
    }

    /// A session is stale once its closing instant has passed.
    pub fn is_stale(&self, session: &WorkSession, now: NaiveDateTime) -> bool {
        session.is_open() && self.closing_instant(session) <= now
    }

    pub fn stale_sessions<'a>(
        &self,
        sessions: &'a [WorkSession],
        now: NaiveDateTime,
    ) -> Vec<&'a WorkSession> {
        sessions.iter().filter(|s| self.is_stale(s, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::breaks::start_break;
    use crate::core::clock::close;
    use crate::core::test_support::{at_on, running_session};
    use crate::models::session::CloseReason;

    #[test]
    fn boundary_instants() {
        let m = BoundaryMonitor::new(4).unwrap();
        assert_eq!(m.latest_boundary(at_on(10, 3, 59)), at_on(9, 4, 0));
        assert_eq!(m.latest_boundary(at_on(10, 4, 0)), at_on(10, 4, 0));
        assert_eq!(m.next_boundary(at_on(10, 4, 0)), at_on(11, 4, 0));
        assert_eq!(m.next_boundary(at_on(10, 1, 0)), at_on(10, 4, 0));
    }

    #[test]
    fn closing_instant_follows_check_in() {
        let m = BoundaryMonitor::new(4).unwrap();
        assert_eq!(m.closing_instant(&running_session(at_on(2, 9, 0))), at_on(3, 4, 0));
        assert_eq!(m.closing_instant(&running_session(at_on(3, 1, 0))), at_on(3, 4, 0));

        let s = running_session(at_on(2, 9, 0));
        assert!(!m.is_stale(&s, at_on(3, 3, 59)));
        assert!(m.is_stale(&s, at_on(3, 4, 0)));
        assert!(m.is_stale(&s, at_on(5, 5, 0)));
    }

    #[test]
    fn rejects_invalid_hour() {
        assert!(BoundaryMonitor::new(24).is_err());
    }

    #[test]
    fn open_sessions_before_boundary_are_stale() {
        let m = BoundaryMonitor::new(4).unwrap();
        let night = running_session(at_on(9, 16, 0));
        let on_break = start_break(&running_session(at_on(9, 20, 0)), at_on(10, 2, 0)).unwrap();
        let fresh = running_session(at_on(10, 4, 30));
        let closed = close(&running_session(at_on(9, 9, 0)), at_on(9, 17, 0), CloseReason::CheckOut)
            .unwrap();

        let all = vec![night, on_break, fresh, closed];
        let stale = m.stale_sessions(&all, at_on(10, 5, 0));
        assert_eq!(stale.len(), 2);
        assert!(stale.iter().all(|s| s.check_in < at_on(10, 4, 0)));
    }
}
