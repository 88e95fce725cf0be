pub mod assign;
pub mod backup;
pub mod boundary;
pub mod breaks;
pub mod checkin;
pub mod checkout;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod replay;
pub mod report;
pub mod retry;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::core::engine::Engine;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Database path from the configuration, with `~` expanded.
pub(crate) fn db_path(cfg: &Config) -> String {
    cfg.database_path().to_string_lossy().to_string()
}

/// Engine over the configured SQLite database, schema brought up to date.
pub(crate) fn open_engine(cfg: &Config) -> AppResult<Engine<DbPool>> {
    let pool = DbPool::open_initialized(&db_path(cfg))?;
    Engine::new(pool, cfg.engine_config()?)
}

/// Append to the internal log; a failure here never fails the command.
pub(crate) fn audit_event(cfg: &Config, operation: &str, target: &str, message: &str) {
    let result = DbPool::new(&db_path(cfg)).and_then(|pool| audit(&pool.conn, operation, target, message));
    if let Err(e) = result {
        warning(format!("Failed to write internal log: {}", e));
    }
}
