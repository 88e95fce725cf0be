//! Monthly performance records and their worked-date sets.

use crate::core::store::PerformanceStore;
use crate::db::conversion_error;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::performance::{PerformanceRecord, PerformanceStatus};
use crate::utils::time::to_db_str;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use std::collections::BTreeSet;

const RECORD_COLUMNS: &str = "employee_id, month_year, total_working_days, total_delay_minutes, \
     total_delay_hours, total_overtime_hours, average_performance_score, \
     punctuality_percentage, performance_status";

fn map_record(row: &Row) -> rusqlite::Result<PerformanceRecord> {
    let status: String = row.get(8)?;
    Ok(PerformanceRecord {
        employee_id: row.get(0)?,
        month_year: row.get(1)?,
        total_working_days: row.get(2)?,
        worked_dates: BTreeSet::new(),
        total_delay_minutes: row.get(3)?,
        total_delay_hours: row.get(4)?,
        total_overtime_hours: row.get(5)?,
        average_performance_score: row.get(6)?,
        punctuality_percentage: row.get(7)?,
        performance_status: PerformanceStatus::from_db_str(&status).ok_or_else(|| {
            conversion_error(8, AppError::Other(format!("unknown status '{status}'")))
        })?,
    })
}

fn load_dates(conn: &Connection, employee_id: &str, month_year: &str) -> AppResult<BTreeSet<NaiveDate>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date FROM worked_dates WHERE employee_id = ?1 AND month_year = ?2",
    )?;
    let rows = stmt.query_map(params![employee_id, month_year], |row| {
        let s: String = row.get(0)?;
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| conversion_error(0, AppError::InvalidDate(s.clone())))
    })?;

    let mut out = BTreeSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

fn load_record(
    conn: &Connection,
    employee_id: &str,
    month_year: &str,
) -> AppResult<Option<PerformanceRecord>> {
    let found = conn
        .query_row(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM performance_records
                 WHERE employee_id = ?1 AND month_year = ?2"
            ),
            params![employee_id, month_year],
            map_record,
        )
        .optional()?;

    match found {
        Some(mut r) => {
            r.worked_dates = load_dates(conn, employee_id, month_year)?;
            Ok(Some(r))
        }
        None => Ok(None),
    }
}

fn write_record(conn: &Connection, r: &PerformanceRecord) -> AppResult<()> {
    let now = to_db_str(&chrono::Local::now().naive_local());
    conn.execute(
        "INSERT INTO performance_records
         (employee_id, month_year, total_working_days, total_delay_minutes, total_delay_hours,
          total_overtime_hours, average_performance_score, punctuality_percentage,
          performance_status, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(employee_id, month_year) DO UPDATE SET
            total_working_days        = excluded.total_working_days,
            total_delay_minutes       = excluded.total_delay_minutes,
            total_delay_hours         = excluded.total_delay_hours,
            total_overtime_hours      = excluded.total_overtime_hours,
            average_performance_score = excluded.average_performance_score,
            punctuality_percentage    = excluded.punctuality_percentage,
            performance_status        = excluded.performance_status,
            updated_at                = excluded.updated_at",
        params![
            r.employee_id,
            r.month_year,
            r.total_working_days,
            r.total_delay_minutes,
            r.total_delay_hours,
            r.total_overtime_hours,
            r.average_performance_score,
            r.punctuality_percentage,
            r.performance_status.to_db_str(),
            now,
        ],
    )?;

    let mut ins = conn.prepare_cached(
        "INSERT OR IGNORE INTO worked_dates (employee_id, month_year, date) VALUES (?1, ?2, ?3)",
    )?;
    for d in &r.worked_dates {
        ins.execute(params![r.employee_id, r.month_year, d.format("%Y-%m-%d").to_string()])?;
    }
    Ok(())
}

impl PerformanceStore for DbPool {
    fn record(&self, employee_id: &str, month_year: &str) -> AppResult<Option<PerformanceRecord>> {
        load_record(&self.conn, employee_id, month_year)
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
        // write lock before the read: no other writer may fold this month in between
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = load_record(&tx, employee_id, month_year)?
            .unwrap_or_else(|| PerformanceRecord::new(employee_id, month_year));
        let next = apply(current);
        write_record(&tx, &next)?;

        tx.commit()?;
        Ok(next)
    }

    fn replace_record(&mut self, record: &PerformanceRecord) -> AppResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM worked_dates WHERE employee_id = ?1 AND month_year = ?2",
            params![record.employee_id, record.month_year],
        )?;
        write_record(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn records(
        &self,
        employee_id: Option<&str>,
        month_year: Option<&str>,
    ) -> AppResult<Vec<PerformanceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM performance_records
             WHERE (?1 IS NULL OR employee_id = ?1)
               AND (?2 IS NULL OR month_year = ?2)
             ORDER BY employee_id ASC, month_year ASC"
        ))?;
        let rows = stmt.query_map(params![employee_id, month_year], map_record)?;

        let mut out = Vec::new();
        for r in rows {
            let mut rec = r?;
            rec.worked_dates = load_dates(&self.conn, &rec.employee_id, &rec.month_year)?;
            out.push(rec);
        }
        Ok(out)
    }
}
