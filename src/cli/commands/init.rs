use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database file
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db = db_path.to_string_lossy().to_string();

    info("Initializing rWorkClock…");
    let pool = DbPool::open_initialized(&db)?;
    success(format!("Database initialized at {}", db));

    if let Err(e) = audit(&pool.conn, "init", &db, "Database initialized") {
        warning(format!("Failed to write internal log: {}", e));
    }

    Ok(())
}
