//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Invalid work-session transitions. Returned before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("employee {0} already has an open work session")]
    AlreadyCheckedIn(String),

    #[error("employee {0} has no open work session")]
    NoOpenSession(String),

    #[error("employee {0} is already on break")]
    AlreadyOnBreak(String),

    #[error("employee {0} is not on break")]
    NotOnBreak(String),

    #[error("work session {0} is already closed")]
    SessionClosed(i64),
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid month (expected YYYY-MM): {0}")]
    InvalidMonth(String),

    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Invalid employee id: {0}")]
    InvalidEmployee(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    // ---------------------------
    // Session / scoring errors
    // ---------------------------
    #[error("Invalid state transition: {0}")]
    State(#[from] StateError),

    #[error("Performance record update failed for session {session_id}: {reason}")]
    ScoreUpsert { session_id: i64, reason: String },

    #[error("Work session not found: {0}")]
    SessionNotFound(i64),

    #[error("Per-employee lock poisoned")]
    LockPoisoned,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors the caller may resolve by re-sending the same event.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::ScoreUpsert { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
