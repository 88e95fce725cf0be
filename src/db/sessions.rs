//! `SessionStore` on SQLite: `work_sessions` plus its `session_breaks` log.

use crate::core::store::SessionStore;
use crate::db::conversion_error;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult, StateError};
use crate::models::session::{BreakInterval, CloseReason, SessionState, WorkSession};
use crate::models::shift::{ResolutionSource, ShiftType};
use crate::utils::time::{from_db_str, to_db_str};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Params, Row, params};

const SESSION_COLUMNS: &str = "id, employee_id, check_in, check_out, shift_type, scheduled_start, \
     shift_end, required_hours, resolution, open_break_start, state, close_reason, scored";

fn ts(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(idx)?;
    from_db_str(&s).map_err(|e| conversion_error(idx, e))
}

fn opt_ts(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| from_db_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn unknown(idx: usize, what: &str, value: &str) -> rusqlite::Error {
    conversion_error(idx, AppError::Other(format!("unknown {what} '{value}'")))
}

fn map_session(row: &Row) -> rusqlite::Result<WorkSession> {
    let shift: String = row.get(4)?;
    let resolution: String = row.get(8)?;
    let state: String = row.get(10)?;
    let reason: Option<String> = row.get(11)?;

    let close_reason = match reason {
        Some(r) => Some(CloseReason::from_db_str(&r).ok_or_else(|| unknown(11, "close reason", &r))?),
        None => None,
    };

    Ok(WorkSession {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        check_in: ts(row, 2)?,
        check_out: opt_ts(row, 3)?,
        shift_type: ShiftType::from_db_str(&shift).ok_or_else(|| unknown(4, "shift", &shift))?,
        scheduled_start: ts(row, 5)?,
        shift_end: ts(row, 6)?,
        required_hours: row.get(7)?,
        resolution: ResolutionSource::from_db_str(&resolution)
            .ok_or_else(|| unknown(8, "resolution", &resolution))?,
        breaks: Vec::new(),
        open_break_start: opt_ts(row, 9)?,
        state: SessionState::from_db_str(&state).ok_or_else(|| unknown(10, "state", &state))?,
        close_reason,
        scored: row.get::<_, i64>(12)? != 0,
    })
}

fn load_breaks(conn: &Connection, session_id: i64) -> AppResult<Vec<BreakInterval>> {
    let mut stmt = conn.prepare_cached(
        "SELECT started_at, ended_at FROM session_breaks
         WHERE session_id = ?1 ORDER BY started_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([session_id], |row| {
        Ok(BreakInterval {
            start: ts(row, 0)?,
            end: ts(row, 1)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn query_sessions<P: Params>(conn: &Connection, filter: &str, params: P) -> AppResult<Vec<WorkSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM work_sessions {filter}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, map_session)?;

    let mut out = Vec::new();
    for r in rows {
        let mut s = r?;
        s.breaks = load_breaks(conn, s.id)?;
        out.push(s);
    }
    Ok(out)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation)
}

impl SessionStore for DbPool {
    fn open_session(&self, employee_id: &str) -> AppResult<Option<WorkSession>> {
        let found = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SESSION_COLUMNS} FROM work_sessions
                     WHERE employee_id = ?1 AND state <> 'closed'"
                ),
                [employee_id],
                map_session,
            )
            .optional()?;

        match found {
            Some(mut s) => {
                s.breaks = load_breaks(&self.conn, s.id)?;
                Ok(Some(s))
            }
            None => Ok(None),
        }
    }

    fn open_sessions(&self) -> AppResult<Vec<WorkSession>> {
        query_sessions(
            &self.conn,
            "WHERE state <> 'closed' ORDER BY check_in ASC, id ASC",
            [],
        )
    }

    fn session(&self, id: i64) -> AppResult<Option<WorkSession>> {
        Ok(query_sessions(&self.conn, "WHERE id = ?1", [id])?.into_iter().next())
    }

    fn save_session(&mut self, session: &WorkSession) -> AppResult<i64> {
        let check_in = to_db_str(&session.check_in);
        let check_out = session.check_out.as_ref().map(to_db_str);
        let scheduled_start = to_db_str(&session.scheduled_start);
        let shift_end = to_db_str(&session.shift_end);
        let open_break = session.open_break_start.as_ref().map(to_db_str);
        let close_reason = session.close_reason.map(|r| r.to_db_str());
        let scored = session.scored as i64;

        let tx = self.conn.transaction()?;

        let written = if session.id == 0 {
            tx.execute(
                "INSERT INTO work_sessions
                 (employee_id, check_in, check_out, shift_type, scheduled_start, shift_end,
                  required_hours, resolution, open_break_start, state, close_reason, scored)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    session.employee_id,
                    check_in,
                    check_out,
                    session.shift_type.to_db_str(),
                    scheduled_start,
                    shift_end,
                    session.required_hours,
                    session.resolution.to_db_str(),
                    open_break,
                    session.state.to_db_str(),
                    close_reason,
                    scored,
                ],
            )
            .map(|_| tx.last_insert_rowid())
        } else {
            tx.execute(
                "UPDATE work_sessions SET
                   employee_id = ?1, check_in = ?2, check_out = ?3, shift_type = ?4,
                   scheduled_start = ?5, shift_end = ?6, required_hours = ?7, resolution = ?8,
                   open_break_start = ?9, state = ?10, close_reason = ?11, scored = ?12
                 WHERE id = ?13",
                params![
                    session.employee_id,
                    check_in,
                    check_out,
                    session.shift_type.to_db_str(),
                    scheduled_start,
                    shift_end,
                    session.required_hours,
                    session.resolution.to_db_str(),
                    open_break,
                    session.state.to_db_str(),
                    close_reason,
                    scored,
                    session.id,
                ],
            )
            .map(|n| if n == 0 { 0 } else { session.id })
        };

        let id = match written {
            Ok(0) => return Err(AppError::SessionNotFound(session.id)),
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                return Err(StateError::AlreadyCheckedIn(session.employee_id.clone()).into());
            }
            Err(e) => return Err(e.into()),
        };

        tx.execute("DELETE FROM session_breaks WHERE session_id = ?1", [id])?;
        {
            let mut ins = tx.prepare_cached(
                "INSERT INTO session_breaks (session_id, started_at, ended_at) VALUES (?1, ?2, ?3)",
            )?;
            for b in &session.breaks {
                ins.execute(params![id, to_db_str(&b.start), to_db_str(&b.end)])?;
            }
        }

        tx.commit()?;
        Ok(id)
    }

    fn closed_sessions_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>> {
        query_sessions(
            &self.conn,
            "WHERE employee_id = ?1 AND state = 'closed'
               AND date(check_in) BETWEEN ?2 AND ?3
             ORDER BY check_in ASC, id ASC",
            params![
                employee_id,
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
        )
    }

    fn unscored_sessions(&self, employee_id: &str) -> AppResult<Vec<WorkSession>> {
        query_sessions(
            &self.conn,
            "WHERE employee_id = ?1 AND state = 'closed' AND scored = 0
             ORDER BY check_in ASC, id ASC",
            [employee_id],
        )
    }

    fn mark_scored(&mut self, id: i64) -> AppResult<()> {
        let n = self
            .conn
            .execute("UPDATE work_sessions SET scored = 1 WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(AppError::SessionNotFound(id));
        }
        Ok(())
    }
}
