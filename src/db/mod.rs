pub mod assignments;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod performance;
pub mod pool;
pub mod sessions;

use crate::errors::AppError;

/// Wrap a domain parse failure so it can travel through a rusqlite row mapper.
pub(crate) fn conversion_error(column: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
