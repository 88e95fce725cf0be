//! rWorkClock library root.
//! Exposes the CLI parser, the high-level run() function, the work-session
//! engine and its SQLite store.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Assign { .. } => commands::assign::handle(&cli.command, cfg),
        Commands::AssignMonth { .. } => commands::assign::handle_month(&cli.command, cfg),
        Commands::Checkin { .. } => commands::checkin::handle(&cli.command, cfg),
        Commands::Break { .. } => commands::breaks::handle(&cli.command, cfg),
        Commands::Checkout { .. } => commands::checkout::handle(&cli.command, cfg),
        Commands::Status { .. } => commands::status::handle(&cli.command, cfg),
        Commands::Boundary { .. } => commands::boundary::handle(&cli.command, cfg),
        Commands::Watch { .. } => commands::watch::handle(&cli.command, cfg),
        Commands::Report { .. } => commands::report::handle(&cli.command, cfg),
        Commands::Replay { .. } => commands::replay::handle(&cli.command, cfg),
        Commands::Retry { .. } => commands::retry::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db wins over the configured path
    let mut cfg = if cli.test { Config::default() } else { Config::load()? };
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
