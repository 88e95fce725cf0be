//! Shift roster tables: per-date `shift_assignments` and the per-month fallback.

use crate::core::store::{AssignmentLookup, AssignmentStore};
use crate::db::conversion_error;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::shift::{ShiftAssignment, ShiftType};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};

fn day_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn shift_col(row: &Row, idx: usize) -> rusqlite::Result<Option<ShiftType>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        None => Ok(None),
        Some(s) => ShiftType::from_db_str(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(idx, AppError::InvalidShift(s))),
    }
}

fn map_assignment(row: &Row) -> rusqlite::Result<ShiftAssignment> {
    let date: String = row.get(1)?;
    Ok(ShiftAssignment {
        employee_id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| conversion_error(1, AppError::InvalidDate(date.clone())))?,
        shift_ref: shift_col(row, 2)?,
        is_day_off: row.get::<_, i64>(3)? != 0,
    })
}

impl AssignmentLookup for DbPool {
    fn assignment_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ShiftAssignment>> {
        Ok(self
            .conn
            .query_row(
                "SELECT employee_id, date, shift_ref, is_day_off
                 FROM shift_assignments
                 WHERE employee_id = ?1 AND date = ?2",
                params![employee_id, day_str(date)],
                map_assignment,
            )
            .optional()?)
    }

    fn monthly_assignment(
        &self,
        employee_id: &str,
        month_year: &str,
    ) -> AppResult<Option<ShiftType>> {
        let found = self
            .conn
            .query_row(
                "SELECT shift_ref FROM monthly_assignments
                 WHERE employee_id = ?1 AND month_year = ?2",
                params![employee_id, month_year],
                |row| shift_col(row, 0),
            )
            .optional()?;
        Ok(found.flatten())
    }

    fn latest_assignment_before(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ShiftAssignment>> {
        Ok(self
            .conn
            .query_row(
                "SELECT employee_id, date, shift_ref, is_day_off
                 FROM shift_assignments
                 WHERE employee_id = ?1 AND date < ?2
                   AND is_day_off = 0 AND shift_ref IS NOT NULL
                 ORDER BY date DESC
                 LIMIT 1",
                params![employee_id, day_str(date)],
                map_assignment,
            )
            .optional()?)
    }
}

impl AssignmentStore for DbPool {
    fn set_assignment(&mut self, assignment: &ShiftAssignment) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO shift_assignments (employee_id, date, shift_ref, is_day_off)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(employee_id, date) DO UPDATE SET
                shift_ref = excluded.shift_ref,
                is_day_off = excluded.is_day_off",
            params![
                assignment.employee_id,
                day_str(assignment.date),
                assignment.shift_ref.map(|s| s.to_db_str()),
                assignment.is_day_off as i64,
            ],
        )?;
        Ok(())
    }

    fn set_monthly_assignment(
        &mut self,
        employee_id: &str,
        month_year: &str,
        shift: ShiftType,
    ) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO monthly_assignments (employee_id, month_year, shift_ref)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(employee_id, month_year) DO UPDATE SET
                shift_ref = excluded.shift_ref",
            params![employee_id, month_year, shift.to_db_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn assign(db: &mut DbPool, day: u32, shift: Option<ShiftType>, off: bool) {
        db.set_assignment(&ShiftAssignment {
            employee_id: "emp-1".into(),
            date: d(day),
            shift_ref: shift,
            is_day_off: off,
        })
        .unwrap();
    }

    #[test]
    fn date_assignment_is_overwritten() {
        let mut db = DbPool::in_memory().unwrap();
        assign(&mut db, 10, Some(ShiftType::Day), false);
        assign(&mut db, 10, None, true);

        let a = db.assignment_on("emp-1", d(10)).unwrap().unwrap();
        assert!(a.is_day_off);
        assert_eq!(a.shift_ref, None);
        assert!(db.assignment_on("emp-1", d(11)).unwrap().is_none());
    }

    #[test]
    fn latest_prior_skips_days_off_and_partial_rows() {
        let mut db = DbPool::in_memory().unwrap();
        assign(&mut db, 2, Some(ShiftType::Night), false);
        assign(&mut db, 4, None, false);
        assign(&mut db, 6, Some(ShiftType::Day), true);
        assign(&mut db, 12, Some(ShiftType::Day), false);

        let a = db.latest_assignment_before("emp-1", d(10)).unwrap().unwrap();
        assert_eq!(a.date, d(2));
        assert_eq!(a.shift_ref, Some(ShiftType::Night));
        assert!(db.latest_assignment_before("emp-1", d(2)).unwrap().is_none());
    }

    #[test]
    fn monthly_assignment_upserts() {
        let mut db = DbPool::in_memory().unwrap();
        assert_eq!(db.monthly_assignment("emp-1", "2025-06").unwrap(), None);

        db.set_monthly_assignment("emp-1", "2025-06", ShiftType::Day).unwrap();
        db.set_monthly_assignment("emp-1", "2025-06", ShiftType::Night).unwrap();
        assert_eq!(
            db.monthly_assignment("emp-1", "2025-06").unwrap(),
            Some(ShiftType::Night)
        );
    }
}
