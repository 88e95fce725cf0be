//! Per-employee serialization of state-mutating events.
//!
//! Reads never take these locks; mutations for one employee run one at a
//! time while different employees proceed independently.

use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct EmployeeLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, employee_id: &str) -> AppResult<Arc<Mutex<()>>> {
        let mut map = self.inner.lock().map_err(|_| AppError::LockPoisoned)?;
        Ok(map
            .entry(employee_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Run `f` while holding the employee's lock.
    pub fn with<T>(&self, employee_id: &str, f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
        let lock = self.handle(employee_id)?;
        let _guard = lock.lock().map_err(|_| AppError::LockPoisoned)?;
        f()
    }
}
