use super::shift::ShiftType;
use serde::Serialize;

/// Display state polled by the surrounding UI at a fixed cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    pub employee_id: String,
    pub session_id: i64,
    pub shift_type: ShiftType,
    pub worked_seconds: i64,
    pub is_on_break: bool,
    pub current_break_seconds: i64,
    pub is_overtime: bool,
    pub overtime_minutes: i64,
    /// Only set past the nominal shift end while still short of the threshold.
    pub hours_remaining_to_threshold: Option<f64>,
}
