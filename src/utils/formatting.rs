//! Formatting utilities used for CLI outputs.

/// Seconds as `HHh MMm` (or `HH:MM:SS` when `clock` is set).
pub fn secs2readable(secs: i64, clock: bool) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;

    if clock {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, s % 60)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Fractional hours rounded to whole minutes, e.g. `0.4167` → `00h 25m`.
pub fn hours2readable(hours: f64) -> String {
    secs2readable((hours * 3600.0).round() as i64, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_durations() {
        assert_eq!(secs2readable(6 * 3600 + 35 * 60, false), "06h 35m");
        assert_eq!(secs2readable(3661, true), "01:01:01");
        assert_eq!(hours2readable(25.0 / 60.0), "00h 25m");
    }
}
