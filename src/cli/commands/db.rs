use crate::cli::commands::db_path;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let path = db_path(cfg);
        let pool = DbPool::new(&path)?;

        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            run_pending_migrations(&pool.conn)?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        if *info {
            print_info(&pool, &path)?;
        }

        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}

fn count(pool: &DbPool, sql: &str) -> AppResult<i64> {
    Ok(pool.conn.query_row(sql, [], |row| row.get(0))?)
}

fn print_info(pool: &DbPool, path: &str) -> AppResult<()> {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    println!("{}▶ Database information{}", CYAN, RESET);
    println!("  File            : {}", path);
    println!("  Size            : {:.1} KiB", size as f64 / 1024.0);

    let versions = applied_versions(&pool.conn)?;
    println!("  Migrations      : {}", versions.len());
    if let Some(last) = versions.last() {
        println!("  Latest          : {}", last);
    }

    if !versions.is_empty() {
        println!(
            "  Sessions        : {}",
            count(pool, "SELECT COUNT(*) FROM work_sessions")?
        );
        println!(
            "  Open sessions   : {}",
            count(pool, "SELECT COUNT(*) FROM work_sessions WHERE state <> 'closed'")?
        );
        println!(
            "  Unscored closed : {}",
            count(pool, "SELECT COUNT(*) FROM work_sessions WHERE state = 'closed' AND scored = 0")?
        );
        println!(
            "  Monthly records : {}",
            count(pool, "SELECT COUNT(*) FROM performance_records")?
        );
    }
    println!();

    Ok(())
}
