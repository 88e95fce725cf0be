//! Event handlers for the work-session core.
//!
//! Mutations for one employee are serialized through [`EmployeeLocks`]; the
//! store lock is only held for individual reads and writes, so employees do
//! not wait on each other while a transition is computed. Reads such as
//! [`Engine::live_state`] take no employee lock.

use crate::core::aggregator;
use crate::core::boundary::BoundaryMonitor;
use crate::core::clock;
use crate::core::locks::EmployeeLocks;
use crate::core::logic::Core;
use crate::core::scoring::outcome_for;
use crate::core::shift::ShiftResolver;
use crate::core::store::Store;
use crate::core::breaks;
use crate::errors::{AppError, AppResult, StateError};
use crate::models::delta::{DeltaKind, SessionDelta};
use crate::models::live::LiveState;
use crate::models::performance::{PerformanceRecord, SessionOutcome};
use crate::models::session::{CloseReason, WorkSession};
use crate::models::shift::{ResolvedShift, ShiftAssignment, ShiftCatalog, ShiftType};
use crate::utils::date::{month_year, parse_month};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub catalog: ShiftCatalog,
    pub boundary_hour: u32,
    pub heuristic_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: ShiftCatalog::default(),
            boundary_hour: 4,
            heuristic_fallback: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckIn {
    pub session: WorkSession,
    pub shift: ResolvedShift,
    pub delta: SessionDelta,
}

#[derive(Debug, Clone)]
pub struct ClosedSession {
    pub session: WorkSession,
    pub outcome: SessionOutcome,
    pub record: PerformanceRecord,
    pub delta: SessionDelta,
}

pub struct Engine<S> {
    store: Mutex<S>,
    locks: EmployeeLocks,
    config: EngineConfig,
    boundary: BoundaryMonitor,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S, config: EngineConfig) -> AppResult<Self> {
        let boundary = BoundaryMonitor::new(config.boundary_hour)?;
        Ok(Self {
            store: Mutex::new(store),
            locks: EmployeeLocks::new(),
            config,
            boundary,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn boundary(&self) -> &BoundaryMonitor {
        &self.boundary
    }

    /// Give the store back, e.g. to inspect it after a run.
    pub fn into_store(self) -> AppResult<S> {
        self.store.into_inner().map_err(|_| AppError::LockPoisoned)
    }

    fn store(&self) -> AppResult<MutexGuard<'_, S>> {
        self.store.lock().map_err(|_| AppError::LockPoisoned)
    }

    fn resolver(&self) -> ShiftResolver<'_> {
        ShiftResolver::new(&self.config.catalog, self.config.heuristic_fallback)
    }

    /// Open session as seen at `at`. One that outlived its daily boundary is
    /// force-closed first and reported as `None`.
    fn current_at(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<Option<WorkSession>> {
        let Some(current) = self.store()?.open_session(employee_id)? else {
            return Ok(None);
        };
        if !self.boundary.is_stale(&current, at) {
            return Ok(Some(current));
        }

        match self.force_close(&current) {
            Ok(_) => {}
            Err(e) if e.is_recoverable() => {
                warn!(employee = employee_id, error = %e, "forced close not scored");
            }
            Err(e) => return Err(e),
        }
        Ok(None)
    }

    fn open_or_fail(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<WorkSession> {
        self.current_at(employee_id, at)?
            .ok_or_else(|| StateError::NoOpenSession(employee_id.to_string()).into())
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    pub fn check_in(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<CheckIn> {
        let employee_id = validate_employee(employee_id)?;

        self.locks.with(employee_id, || {
            let current = self.current_at(employee_id, at)?;
            if current.is_some() {
                return Err(StateError::AlreadyCheckedIn(employee_id.to_string()).into());
            }

            let shift = {
                let store = self.store()?;
                self.resolver().resolve(&*store, employee_id, at.date(), at)
            };
            if shift.degraded {
                warn!(
                    employee = employee_id,
                    shift = shift.shift_type.label(),
                    source = shift.source.to_db_str(),
                    "degraded shift resolution"
                );
            }

            let mut session = clock::check_in(current.as_ref(), employee_id, at, &shift)?;
            session.id = self.store()?.save_session(&session)?;

            info!(
                employee = employee_id,
                session = session.id,
                shift = shift.shift_type.label(),
                "checked in"
            );

            let delta = SessionDelta::of(&session, DeltaKind::CheckedIn, at);
            Ok(CheckIn {
                session,
                shift,
                delta,
            })
        })
    }

    pub fn start_break(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<SessionDelta> {
        let employee_id = validate_employee(employee_id)?;

        self.locks.with(employee_id, || {
            let current = self.open_or_fail(employee_id, at)?;
            let next = breaks::start_break(&current, at)?;
            self.store()?.save_session(&next)?;
            debug!(employee = employee_id, session = next.id, "break started");
            Ok(SessionDelta::of(&next, DeltaKind::BreakStarted, at))
        })
    }

    pub fn end_break(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<SessionDelta> {
        let employee_id = validate_employee(employee_id)?;

        self.locks.with(employee_id, || {
            let current = self.open_or_fail(employee_id, at)?;
            let next = breaks::end_break(&current, at)?;
            self.store()?.save_session(&next)?;
            debug!(employee = employee_id, session = next.id, "break ended");
            Ok(SessionDelta::of(&next, DeltaKind::BreakEnded, at))
        })
    }

    /// Close and score the open session. A check-out arriving after the
    /// session's daily boundary gets the forced close at that boundary.
    pub fn check_out(&self, employee_id: &str, at: NaiveDateTime) -> AppResult<ClosedSession> {
        let employee_id = validate_employee(employee_id)?;

        self.locks.with(employee_id, || {
            let current = self
                .store()?
                .open_session(employee_id)?
                .ok_or_else(|| StateError::NoOpenSession(employee_id.to_string()))?;

            if self.boundary.is_stale(&current, at) {
                self.force_close(&current)
            } else {
                self.close_and_score(&current, at, CloseReason::CheckOut)
            }
        })
    }

    /// Force-close every session whose daily boundary has passed.
    ///
    /// Each close is pinned to the first boundary after that session's
    /// check-in. A failed record update for one employee does not stop the
    /// pass; the session stays unscored for [`Engine::retry_pending_scores`].
    pub fn run_boundary(&self, now: NaiveDateTime) -> AppResult<Vec<ClosedSession>> {
        let open = self.store()?.open_sessions()?;
        let stale: Vec<WorkSession> = self
            .boundary
            .stale_sessions(&open, now)
            .into_iter()
            .cloned()
            .collect();

        let mut closed = Vec::with_capacity(stale.len());
        for candidate in stale {
            let employee_id = candidate.employee_id.clone();
            let result = self.locks.with(&employee_id, || {
                // re-read under the lock: the employee may have checked out meanwhile
                let current = self.store()?.open_session(&employee_id)?;
                match current {
                    Some(s) if s.id == candidate.id => self.force_close(&s).map(Some),
                    _ => Ok(None),
                }
            });

            match result {
                Ok(Some(c)) => closed.push(c),
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    warn!(employee = %employee_id, error = %e, "forced close not scored");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(closed)
    }

    fn force_close(&self, session: &WorkSession) -> AppResult<ClosedSession> {
        let boundary_at = self.boundary.closing_instant(session);
        warn!(
            employee = %session.employee_id,
            session = session.id,
            at = %boundary_at,
            "session force-closed at daily boundary"
        );
        self.close_and_score(session, boundary_at, CloseReason::Forced)
    }

    fn close_and_score(
        &self,
        session: &WorkSession,
        at: NaiveDateTime,
        reason: CloseReason,
    ) -> AppResult<ClosedSession> {
        let mut closed = clock::close(session, at, reason)?;
        self.store()?.save_session(&closed)?;

        let kind = match reason {
            CloseReason::CheckOut => DeltaKind::CheckedOut,
            CloseReason::Forced => DeltaKind::ForceClosed,
        };
        let delta = SessionDelta::of(&closed, kind, at);

        let outcome = outcome_for(&closed);
        let record = self.apply_outcome(&outcome)?;
        self.store()?.mark_scored(closed.id)?;
        closed.scored = true;

        info!(
            employee = %closed.employee_id,
            session = closed.id,
            score = outcome.final_score,
            status = outcome.status.label(),
            "session closed"
        );

        Ok(ClosedSession {
            session: closed,
            outcome,
            record,
            delta,
        })
    }

    fn apply_outcome(&self, outcome: &SessionOutcome) -> AppResult<PerformanceRecord> {
        let month = month_year(outcome.date);
        let result =
            self.store()?
                .upsert_record(&outcome.employee_id, &month, |r| aggregator::fold(r, outcome));

        result.map_err(|e| {
            warn!(
                employee = %outcome.employee_id,
                session = outcome.session_id,
                error = %e,
                "performance record update failed"
            );
            AppError::ScoreUpsert {
                session_id: outcome.session_id,
                reason: e.to_string(),
            }
        })
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Display state for the employee's open session; `None` when idle.
    ///
    /// A session past its daily boundary is shown pinned at that boundary
    /// until a mutation or a boundary pass closes it.
    pub fn live_state(&self, employee_id: &str, now: NaiveDateTime) -> AppResult<Option<LiveState>> {
        let Some(session) = self.store()?.open_session(employee_id)? else {
            return Ok(None);
        };

        if self.boundary.is_stale(&session, now) {
            let until = self.boundary.closing_instant(&session);
            let pinned = clock::close(&session, until, CloseReason::Forced)?;
            return Ok(Some(Core::build_live_state(&pinned, until)));
        }
        Ok(Some(Core::build_live_state(&session, now)))
    }

    pub fn open_session(&self, employee_id: &str) -> AppResult<Option<WorkSession>> {
        self.store()?.open_session(employee_id)
    }

    pub fn record(&self, employee_id: &str, month_year: &str) -> AppResult<Option<PerformanceRecord>> {
        self.store()?.record(employee_id, month_year)
    }

    pub fn records(
        &self,
        employee_id: Option<&str>,
        month_year: Option<&str>,
    ) -> AppResult<Vec<PerformanceRecord>> {
        self.store()?.records(employee_id, month_year)
    }

    // -----------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------

    /// Fold closed sessions whose record update previously failed.
    pub fn retry_pending_scores(&self, employee_id: &str) -> AppResult<Vec<SessionOutcome>> {
        let employee_id = validate_employee(employee_id)?;

        self.locks.with(employee_id, || {
            let pending = self.store()?.unscored_sessions(employee_id)?;
            let mut done = Vec::with_capacity(pending.len());
            for session in pending {
                let outcome = outcome_for(&session);
                self.apply_outcome(&outcome)?;
                self.store()?.mark_scored(session.id)?;
                done.push(outcome);
            }
            if !done.is_empty() {
                info!(employee = employee_id, count = done.len(), "pending scores applied");
            }
            Ok(done)
        })
    }

    /// Rebuild one month's record from the persisted closed sessions.
    pub fn replay_month(&self, employee_id: &str, month: &str) -> AppResult<PerformanceRecord> {
        let employee_id = validate_employee(employee_id)?;
        let (first, last) = parse_month(month)?;
        let month_key = month_year(first);

        self.locks.with(employee_id, || {
            let sessions = self
                .store()?
                .closed_sessions_between(employee_id, first, last)?;
            let outcomes: Vec<SessionOutcome> = sessions.iter().map(outcome_for).collect();
            let rebuilt = aggregator::replay(employee_id, &month_key, &outcomes);

            let mut store = self.store()?;
            store.replace_record(&rebuilt)?;
            for s in sessions.iter().filter(|s| !s.scored) {
                store.mark_scored(s.id)?;
            }

            info!(
                employee = employee_id,
                month = %month_key,
                sessions = sessions.len(),
                "monthly record replayed"
            );
            Ok(rebuilt)
        })
    }

    // -----------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------

    pub fn assign_shift(
        &self,
        employee_id: &str,
        date: NaiveDate,
        shift: Option<ShiftType>,
        is_day_off: bool,
    ) -> AppResult<ShiftAssignment> {
        let employee_id = validate_employee(employee_id)?;
        if shift.is_none() && !is_day_off {
            return Err(AppError::InvalidShift(
                "an assignment needs a shift or a day off".into(),
            ));
        }

        let assignment = ShiftAssignment {
            employee_id: employee_id.to_string(),
            date,
            shift_ref: if is_day_off { None } else { shift },
            is_day_off,
        };
        self.store()?.set_assignment(&assignment)?;
        Ok(assignment)
    }

    pub fn assign_month(&self, employee_id: &str, month: &str, shift: ShiftType) -> AppResult<()> {
        let employee_id = validate_employee(employee_id)?;
        let (first, _) = parse_month(month)?;
        self.store()?
            .set_monthly_assignment(employee_id, &month_year(first), shift)
    }
}

fn validate_employee(employee_id: &str) -> AppResult<&str> {
    let trimmed = employee_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidEmployee(employee_id.to_string()));
    }
    Ok(trimmed)
}
