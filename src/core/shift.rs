//! Resolve which shift a check-in belongs to.
//!
//! Sources are tried in order: the per-date assignment, the monthly fallback
//! table, the most recent prior working assignment, and finally the check-in
//! clock hour. A failing or partial source is skipped and marks the result as
//! degraded; it never aborts the check-in.

use crate::core::store::AssignmentLookup;
use crate::errors::AppResult;
use crate::models::shift::{ResolutionSource, ResolvedShift, ShiftCatalog, ShiftType};
use crate::utils::date::month_year;
use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, warn};

/// Clock-hour window classified as a day shift by the heuristic.
const DAY_HOURS: std::ops::Range<u32> = 8..16;

pub struct ShiftResolver<'a> {
    catalog: &'a ShiftCatalog,
    heuristic_fallback: bool,
}

impl<'a> ShiftResolver<'a> {
    pub fn new(catalog: &'a ShiftCatalog, heuristic_fallback: bool) -> Self {
        Self {
            catalog,
            heuristic_fallback,
        }
    }

    pub fn resolve<L: AssignmentLookup + ?Sized>(
        &self,
        lookup: &L,
        employee_id: &str,
        date: NaiveDate,
        check_in: NaiveDateTime,
    ) -> ResolvedShift {
        let mut degraded = false;

        // (a) explicit assignment for the date
        if let Some(a) = attempt("date assignment", lookup.assignment_on(employee_id, date), &mut degraded) {
            if a.is_day_off {
                debug!(employee = employee_id, %date, "check-in on a rostered day off");
            } else if let Some(kind) = a.shift_ref {
                return self.build(kind, check_in, ResolutionSource::DateAssignment, degraded);
            } else {
                warn!(employee = employee_id, %date, "assignment without shift reference, skipping");
                degraded = true;
            }
        }

        // (b) monthly fallback table
        let month = month_year(date);
        if let Some(kind) = attempt(
            "monthly assignment",
            lookup.monthly_assignment(employee_id, &month),
            &mut degraded,
        ) {
            return self.build(kind, check_in, ResolutionSource::MonthlyAssignment, degraded);
        }

        // (c) most recent prior working assignment
        if let Some(kind) = attempt(
            "prior assignment",
            lookup.latest_assignment_before(employee_id, date),
            &mut degraded,
        )
        .and_then(|a| a.shift_ref)
        {
            return self.build(kind, check_in, ResolutionSource::PriorAssignment, degraded);
        }

        // (d) clock hour of the check-in
        if self.heuristic_fallback {
            let kind = classify_hour(check_in.hour());
            return self.build(kind, check_in, ResolutionSource::ClockHeuristic, degraded);
        }

        warn!(
            employee = employee_id,
            %date,
            "no shift source resolved, defaulting to night shift"
        );
        self.build(ShiftType::Night, check_in, ResolutionSource::Default, true)
    }

    fn build(
        &self,
        kind: ShiftType,
        check_in: NaiveDateTime,
        source: ResolutionSource,
        degraded: bool,
    ) -> ResolvedShift {
        let (scheduled_start, shift_end) = self.window(kind, check_in);
        ResolvedShift {
            shift_type: kind,
            scheduled_start,
            shift_end,
            required_hours: self.catalog.get(kind).required_hours,
            source,
            degraded,
        }
    }

    /// Scheduled start and end of the shift instance containing `check_in`.
    ///
    /// For a shift crossing midnight, a check-in before the end time belongs
    /// to the instance that started the previous evening.
    pub fn window(&self, kind: ShiftType, check_in: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let shift = self.catalog.get(kind);
        let date = check_in.date();

        if !shift.crosses_midnight() {
            return (date.and_time(shift.start_time), date.and_time(shift.end_time));
        }

        if check_in.time() < shift.end_time {
            let prev = date.checked_sub_days(Days::new(1)).unwrap_or(date);
            (prev.and_time(shift.start_time), date.and_time(shift.end_time))
        } else {
            let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
            (date.and_time(shift.start_time), next.and_time(shift.end_time))
        }
    }
}

pub fn classify_hour(hour: u32) -> ShiftType {
    if DAY_HOURS.contains(&hour) {
        ShiftType::Day
    } else {
        ShiftType::Night
    }
}

/// Unwrap a lookup result, logging and flagging failures.
fn attempt<T>(step: &str, result: AppResult<Option<T>>, degraded: &mut bool) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            warn!(step, error = %e, "shift lookup failed, falling through");
            *degraded = true;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{AssignmentStore, MemoryStore};
    use crate::core::test_support::{at_on, day};
    use crate::errors::AppError;
    use crate::models::shift::ShiftAssignment;

    fn assignment(d: u32, shift: Option<ShiftType>, off: bool) -> ShiftAssignment {
        ShiftAssignment {
            employee_id: "emp-1".into(),
            date: day(d),
            shift_ref: shift,
            is_day_off: off,
        }
    }

    struct BrokenLookup;

    impl AssignmentLookup for BrokenLookup {
        fn assignment_on(&self, _: &str, _: NaiveDate) -> AppResult<Option<ShiftAssignment>> {
            Err(AppError::Other("roster offline".into()))
        }
        fn monthly_assignment(&self, _: &str, _: &str) -> AppResult<Option<ShiftType>> {
            Err(AppError::Other("roster offline".into()))
        }
        fn latest_assignment_before(
            &self,
            _: &str,
            _: NaiveDate,
        ) -> AppResult<Option<ShiftAssignment>> {
            Err(AppError::Other("roster offline".into()))
        }
    }

    #[test]
    fn date_assignment_wins() {
        let catalog = ShiftCatalog::default();
        let mut store = MemoryStore::new();
        store.set_assignment(&assignment(10, Some(ShiftType::Night), false)).unwrap();
        store.set_monthly_assignment("emp-1", "2025-06", ShiftType::Day).unwrap();

        let r = ShiftResolver::new(&catalog, true).resolve(&store, "emp-1", day(10), at_on(10, 9, 0));
        assert_eq!(r.shift_type, ShiftType::Night);
        assert_eq!(r.source, ResolutionSource::DateAssignment);
        assert_eq!(r.required_hours, 8.0);
        assert!(!r.degraded);
    }

    #[test]
    fn day_off_falls_through_to_monthly() {
        let catalog = ShiftCatalog::default();
        let mut store = MemoryStore::new();
        store.set_assignment(&assignment(10, None, true)).unwrap();
        store.set_monthly_assignment("emp-1", "2025-06", ShiftType::Day).unwrap();

        let r = ShiftResolver::new(&catalog, true).resolve(&store, "emp-1", day(10), at_on(10, 20, 0));
        assert_eq!(r.shift_type, ShiftType::Day);
        assert_eq!(r.source, ResolutionSource::MonthlyAssignment);
    }

    #[test]
    fn prior_working_assignment_is_reused() {
        let catalog = ShiftCatalog::default();
        let mut store = MemoryStore::new();
        store.set_assignment(&assignment(3, Some(ShiftType::Night), false)).unwrap();
        store.set_assignment(&assignment(5, None, true)).unwrap();

        let r = ShiftResolver::new(&catalog, true).resolve(&store, "emp-1", day(10), at_on(10, 10, 0));
        assert_eq!(r.shift_type, ShiftType::Night);
        assert_eq!(r.source, ResolutionSource::PriorAssignment);
    }

    #[test]
    fn heuristic_uses_clock_hour() {
        let catalog = ShiftCatalog::default();
        let store = MemoryStore::new();
        let resolver = ShiftResolver::new(&catalog, true);

        let d = resolver.resolve(&store, "emp-1", day(10), at_on(10, 8, 0));
        assert_eq!(d.shift_type, ShiftType::Day);
        assert_eq!(d.shift_end, at_on(10, 16, 0));
        assert_eq!(d.required_hours, 7.0);

        let late = resolver.resolve(&store, "emp-1", day(10), at_on(10, 15, 59));
        assert_eq!(late.shift_type, ShiftType::Day);

        let n = resolver.resolve(&store, "emp-1", day(10), at_on(10, 16, 0));
        assert_eq!(n.shift_type, ShiftType::Night);
        assert_eq!(n.source, ResolutionSource::ClockHeuristic);
    }

    #[test]
    fn night_window_depends_on_check_in_hour() {
        let catalog = ShiftCatalog::default();
        let resolver = ShiftResolver::new(&catalog, true);

        let (start, end) = resolver.window(ShiftType::Night, at_on(10, 15, 30));
        assert_eq!(start, at_on(10, 16, 0));
        assert_eq!(end, at_on(11, 4, 0));

        // continuation of the previous night
        let (start, end) = resolver.window(ShiftType::Night, at_on(10, 2, 0));
        assert_eq!(start, at_on(9, 16, 0));
        assert_eq!(end, at_on(10, 4, 0));
    }

    #[test]
    fn failing_sources_degrade_but_resolve() {
        let catalog = ShiftCatalog::default();
        let r = ShiftResolver::new(&catalog, true).resolve(&BrokenLookup, "emp-1", day(10), at_on(10, 9, 0));
        assert_eq!(r.shift_type, ShiftType::Day);
        assert_eq!(r.source, ResolutionSource::ClockHeuristic);
        assert!(r.degraded);
    }

    #[test]
    fn without_heuristic_defaults_to_night() {
        let catalog = ShiftCatalog::default();
        let store = MemoryStore::new();
        let r = ShiftResolver::new(&catalog, false).resolve(&store, "emp-1", day(10), at_on(10, 9, 0));
        assert_eq!(r.shift_type, ShiftType::Night);
        assert_eq!(r.required_hours, 8.0);
        assert_eq!(r.source, ResolutionSource::Default);
        assert!(r.degraded);
    }
}
