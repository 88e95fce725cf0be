use super::session::{SessionState, WorkSession};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeltaKind {
    CheckedIn,
    BreakStarted,
    BreakEnded,
    CheckedOut,
    ForceClosed,
}

impl DeltaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaKind::CheckedIn => "checkin",
            DeltaKind::BreakStarted => "break_start",
            DeltaKind::BreakEnded => "break_end",
            DeltaKind::CheckedOut => "checkout",
            DeltaKind::ForceClosed => "forced_close",
        }
    }
}

/// Targeted change notification for a single session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDelta {
    pub employee_id: String,
    pub session_id: i64,
    pub kind: DeltaKind,
    pub at: NaiveDateTime,
    pub state: SessionState,
}

impl SessionDelta {
    pub fn of(session: &WorkSession, kind: DeltaKind, at: NaiveDateTime) -> Self {
        Self {
            employee_id: session.employee_id.clone(),
            session_id: session.id,
            kind,
            at,
            state: session.state,
        }
    }
}
