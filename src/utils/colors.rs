/// ANSI color helper utilities for terminal output.
use crate::models::performance::PerformanceStatus;

pub const RESET: &str = "\x1b[0m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

pub fn color_for_status(status: PerformanceStatus) -> &'static str {
    match status {
        PerformanceStatus::Excellent => GREEN,
        PerformanceStatus::Good => CYAN,
        PerformanceStatus::NeedsImprovement => YELLOW,
        PerformanceStatus::Poor => RED,
    }
}

/// Overtime in magenta, an open countdown in yellow, otherwise plain.
pub fn color_for_clock(is_overtime: bool, counting_down: bool) -> &'static str {
    if is_overtime {
        MAGENTA
    } else if counting_down {
        YELLOW
    } else {
        RESET
    }
}
