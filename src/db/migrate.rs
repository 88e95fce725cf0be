//! Versioned schema migrations.
//!
//! Each migration runs once, inside a transaction, and is recorded in the
//! `log` table as `migration_applied` with its version as target.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250601_0001_create_work_sessions",
        description: "Created work_sessions and session_breaks",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id       TEXT NOT NULL,
            check_in          TEXT NOT NULL,
            check_out         TEXT,
            shift_type        TEXT NOT NULL CHECK(shift_type IN ('day','night')),
            scheduled_start   TEXT NOT NULL,
            shift_end         TEXT NOT NULL,
            required_hours    REAL NOT NULL,
            resolution        TEXT NOT NULL DEFAULT 'heuristic',
            open_break_start  TEXT,
            state             TEXT NOT NULL CHECK(state IN ('running','on_break','closed')),
            close_reason      TEXT CHECK(close_reason IN ('checkout','forced')),
            scored            INTEGER NOT NULL DEFAULT 0
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_open
            ON work_sessions(employee_id) WHERE state <> 'closed';
        CREATE INDEX IF NOT EXISTS idx_sessions_employee_checkin
            ON work_sessions(employee_id, check_in);

        CREATE TABLE IF NOT EXISTS session_breaks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER NOT NULL REFERENCES work_sessions(id) ON DELETE CASCADE,
            started_at  TEXT NOT NULL,
            ended_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_breaks_session ON session_breaks(session_id);
        "#,
    },
    Migration {
        version: "20250601_0002_create_shift_assignments",
        description: "Created shift_assignments and monthly_assignments",
        sql: r#"
        CREATE TABLE IF NOT EXISTS shift_assignments (
            employee_id  TEXT NOT NULL,
            date         TEXT NOT NULL,
            shift_ref    TEXT CHECK(shift_ref IN ('day','night')),
            is_day_off   INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (employee_id, date)
        );

        CREATE TABLE IF NOT EXISTS monthly_assignments (
            employee_id  TEXT NOT NULL,
            month_year   TEXT NOT NULL,
            shift_ref    TEXT NOT NULL CHECK(shift_ref IN ('day','night')),
            PRIMARY KEY (employee_id, month_year)
        );
        "#,
    },
    Migration {
        version: "20250601_0003_create_performance_records",
        description: "Created performance_records and worked_dates",
        sql: r#"
        CREATE TABLE IF NOT EXISTS performance_records (
            employee_id                TEXT NOT NULL,
            month_year                 TEXT NOT NULL,
            total_working_days         INTEGER NOT NULL DEFAULT 0,
            total_delay_minutes        INTEGER NOT NULL DEFAULT 0,
            total_delay_hours          REAL NOT NULL DEFAULT 0,
            total_overtime_hours       REAL NOT NULL DEFAULT 0,
            average_performance_score  REAL NOT NULL DEFAULT 0,
            punctuality_percentage     REAL NOT NULL DEFAULT 100,
            performance_status         TEXT NOT NULL DEFAULT 'excellent',
            updated_at                 TEXT NOT NULL,
            PRIMARY KEY (employee_id, month_year)
        );

        CREATE TABLE IF NOT EXISTS worked_dates (
            employee_id  TEXT NOT NULL,
            month_year   TEXT NOT NULL,
            date         TEXT NOT NULL,
            PRIMARY KEY (employee_id, month_year, date)
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let fail = |e: rusqlite::Error| AppError::Migration(format!("{}: {}", m.version, e));

    let tx = conn.unchecked_transaction().map_err(fail)?;
    tx.execute_batch(m.sql).map_err(fail)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )
    .map_err(fail)?;
    tx.commit().map_err(fail)?;

    info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations, oldest first.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied = applied_versions(&conn).unwrap();
        assert_eq!(applied.len(), MIGRATIONS.len());
        assert_eq!(applied[0], "20250601_0001_create_work_sessions");
    }

    #[test]
    fn one_open_session_per_employee_is_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        let insert = "INSERT INTO work_sessions
            (employee_id, check_in, shift_type, scheduled_start, shift_end, required_hours, state)
            VALUES ('e1', '2025-06-02 09:00:00', 'day', '2025-06-02 09:00:00',
                    '2025-06-02 16:00:00', 7, ?1)";

        conn.execute(insert, ["closed"]).unwrap();
        conn.execute(insert, ["running"]).unwrap();
        assert!(conn.execute(insert, ["on_break"]).is_err());
    }

    #[test]
    fn new_sessions_start_unscored() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        assert_eq!(applied_versions(&conn).unwrap().len(), 3);

        conn.execute(
            "INSERT INTO work_sessions
             (employee_id, check_in, shift_type, scheduled_start, shift_end, required_hours, state)
             VALUES ('e1', '2025-06-02 09:00:00', 'day', '2025-06-02 09:00:00',
                     '2025-06-02 16:00:00', 7, 'running')",
            [],
        )
        .unwrap();
        let scored: i64 = conn
            .query_row("SELECT scored FROM work_sessions WHERE employee_id = 'e1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(scored, 0);
    }
}
