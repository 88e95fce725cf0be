//! Persistence seams consumed by the engine, plus an in-memory implementation.
//!
//! The SQLite implementation lives in `crate::db`; both must keep at most one
//! non-closed session per employee.

use crate::errors::{AppError, AppResult, StateError};
use crate::models::performance::PerformanceRecord;
use crate::models::session::{SessionState, WorkSession};
use crate::models::shift::{ShiftAssignment, ShiftType};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub trait SessionStore {
    /// The employee's non-closed session, if any.
    fn open_session(&self, employee_id: &str) -> AppResult<Option<WorkSession>>;

    /// Every non-closed session, all employees.
    fn open_sessions(&self) -> AppResult<Vec<WorkSession>>;

    fn session(&self, id: i64) -> AppResult<Option<WorkSession>>;

    /// Insert (`id == 0`) or update a session with its break log; returns the id.
    fn save_session(&mut self, session: &WorkSession) -> AppResult<i64>;

    /// Closed sessions whose check-in date falls in `from..=to`, oldest first.
    fn closed_sessions_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>>;

    /// Closed sessions not yet folded into a performance record, oldest first.
    fn unscored_sessions(&self, employee_id: &str) -> AppResult<Vec<WorkSession>>;

    fn mark_scored(&mut self, id: i64) -> AppResult<()>;
}

/// Shift-assignment lookup used by the shift resolver.
pub trait AssignmentLookup {
    fn assignment_on(&self, employee_id: &str, date: NaiveDate)
    -> AppResult<Option<ShiftAssignment>>;

    fn monthly_assignment(&self, employee_id: &str, month_year: &str)
    -> AppResult<Option<ShiftType>>;

    /// Most recent assignment strictly before `date` that names a shift and is not a day off.
    fn latest_assignment_before(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ShiftAssignment>>;
}

pub trait AssignmentStore: AssignmentLookup {
    fn set_assignment(&mut self, assignment: &ShiftAssignment) -> AppResult<()>;

    fn set_monthly_assignment(
        &mut self,
        employee_id: &str,
        month_year: &str,
        shift: ShiftType,
    ) -> AppResult<()>;
}

pub trait PerformanceStore {
    fn record(&self, employee_id: &str, month_year: &str) -> AppResult<Option<PerformanceRecord>>;

    /// Atomic read-modify-write of one `(employee_id, month_year)` record.
    /// `apply` receives the stored record, or a fresh one on first use.
    fn upsert_record<F>(
        &mut self,
        employee_id: &str,
        month_year: &str,
        apply: F,
    ) -> AppResult<PerformanceRecord>
    where
        F: FnOnce(PerformanceRecord) -> PerformanceRecord;

    /// Overwrite a record wholesale (replay).
    fn replace_record(&mut self, record: &PerformanceRecord) -> AppResult<()>;

    fn records(
        &self,
        employee_id: Option<&str>,
        month_year: Option<&str>,
    ) -> AppResult<Vec<PerformanceRecord>>;
}

/// Everything the engine needs from storage.
pub trait Store: SessionStore + AssignmentStore + PerformanceStore {}

impl<T: SessionStore + AssignmentStore + PerformanceStore> Store for T {}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Vec<WorkSession>, // id = index + 1
    assignments: BTreeMap<(String, NaiveDate), ShiftAssignment>,
    monthly: HashMap<(String, String), ShiftType>,
    records: BTreeMap<(String, String), PerformanceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn open_session(&self, employee_id: &str) -> AppResult<Option<WorkSession>> {
        Ok(self
            .sessions
            .iter()
            .find(|s| s.employee_id == employee_id && s.is_open())
            .cloned())
    }

    fn open_sessions(&self) -> AppResult<Vec<WorkSession>> {
        Ok(self.sessions.iter().filter(|s| s.is_open()).cloned().collect())
    }

    fn session(&self, id: i64) -> AppResult<Option<WorkSession>> {
        if id <= 0 {
            return Ok(None);
        }
        Ok(self.sessions.get((id - 1) as usize).cloned())
    }

    fn save_session(&mut self, session: &WorkSession) -> AppResult<i64> {
        if session.is_open() {
            let clash = self
                .sessions
                .iter()
                .any(|s| s.employee_id == session.employee_id && s.is_open() && s.id != session.id);
            if clash {
                return Err(StateError::AlreadyCheckedIn(session.employee_id.clone()).into());
            }
        }

        if session.id == 0 {
            let id = self.sessions.len() as i64 + 1;
            let mut stored = session.clone();
            stored.id = id;
            self.sessions.push(stored);
            return Ok(id);
        }

        let slot = self
            .sessions
            .get_mut((session.id - 1).max(0) as usize)
            .filter(|s| s.id == session.id)
            .ok_or(AppError::SessionNotFound(session.id))?;
        *slot = session.clone();
        Ok(session.id)
    }

    fn closed_sessions_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>> {
        let mut out: Vec<WorkSession> = self
            .sessions
            .iter()
            .filter(|s| {
                s.employee_id == employee_id
                    && s.state == SessionState::Closed
                    && (from..=to).contains(&s.work_date())
            })
            .cloned()
            .collect();
        out.sort_by_key(|s| s.check_in);
        Ok(out)
    }

    fn unscored_sessions(&self, employee_id: &str) -> AppResult<Vec<WorkSession>> {
        let mut out: Vec<WorkSession> = self
            .sessions
            .iter()
            .filter(|s| s.employee_id == employee_id && !s.is_open() && !s.scored)
            .cloned()
            .collect();
        out.sort_by_key(|s| s.check_in);
        Ok(out)
    }

    fn mark_scored(&mut self, id: i64) -> AppResult<()> {
        let slot = self
            .sessions
            .get_mut((id - 1).max(0) as usize)
            .filter(|s| s.id == id)
            .ok_or(AppError::SessionNotFound(id))?;
        slot.scored = true;
        Ok(())
    }
}

impl AssignmentLookup for MemoryStore {
    fn assignment_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ShiftAssignment>> {
        Ok(self
            .assignments
            .get(&(employee_id.to_string(), date))
            .cloned())
    }

    fn monthly_assignment(
        &self,
        employee_id: &str,
        month_year: &str,
    ) -> AppResult<Option<ShiftType>> {
        Ok(self
            .monthly
            .get(&(employee_id.to_string(), month_year.to_string()))
            .copied())
    }

    fn latest_assignment_before(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ShiftAssignment>> {
        Ok(self
            .assignments
            .values()
            .rev()
            .find(|a| {
                a.employee_id == employee_id
                    && a.date < date
                    && !a.is_day_off
                    && a.shift_ref.is_some()
            })
            .cloned())
    }
}

impl AssignmentStore for MemoryStore {
    fn set_assignment(&mut self, assignment: &ShiftAssignment) -> AppResult<()> {
        self.assignments.insert(
            (assignment.employee_id.clone(), assignment.date),
            assignment.clone(),
        );
        Ok(())
    }

    fn set_monthly_assignment(
        &mut self,
        employee_id: &str,
        month_year: &str,
        shift: ShiftType,
    ) -> AppResult<()> {
        self.monthly
            .insert((employee_id.to_string(), month_year.to_string()), shift);
        Ok(())
    }
}

impl PerformanceStore for MemoryStore {
    fn record(&self, employee_id: &str, month_year: &str) -> AppResult<Option<PerformanceRecord>> {
        Ok(self
            .records
            .get(&(employee_id.to_string(), month_year.to_string()))
            .cloned())
    }

    fn upsert_record<F>(
        &mut self,
        employee_id: &str,
        month_year: &str,
        apply: F,
    ) -> AppResult<PerformanceRecord>
    where
        F: FnOnce(PerformanceRecord) -> PerformanceRecord,
    {
        let key = (employee_id.to_string(), month_year.to_string());
        let current = self
            .records
            .get(&key)
            .cloned()
            .unwrap_or_else(|| PerformanceRecord::new(employee_id, month_year));
        let next = apply(current);
        self.records.insert(key, next.clone());
        Ok(next)
    }

    fn replace_record(&mut self, record: &PerformanceRecord) -> AppResult<()> {
        self.records.insert(
            (record.employee_id.clone(), record.month_year.clone()),
            record.clone(),
        );
        Ok(())
    }

    fn records(
        &self,
        employee_id: Option<&str>,
        month_year: Option<&str>,
    ) -> AppResult<Vec<PerformanceRecord>> {
        Ok(self
            .records
            .values()
            .filter(|r| employee_id.is_none_or(|e| r.employee_id == e))
            .filter(|r| month_year.is_none_or(|m| r.month_year == m))
            .cloned()
            .collect())
    }
}
