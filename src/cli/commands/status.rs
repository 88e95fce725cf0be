use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::live::LiveState;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_clock};
use crate::utils::formatting::{hours2readable, secs2readable};
use crate::utils::time::parse_optional_at;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { employee, at, json } = cmd {
        let now = parse_optional_at(at.as_ref())?;
        let engine = open_engine(cfg)?;
        let state = engine.live_state(employee.trim(), now)?;

        if *json {
            let out = serde_json::to_string_pretty(&state).map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        match state {
            Some(s) => println!("{}", render(&s)),
            None => info(format!("{} has no open work session", employee.trim())),
        }
    }

    Ok(())
}

/// One-line clock display, also used by `watch`.
pub(crate) fn render(s: &LiveState) -> String {
    let color = color_for_clock(s.is_overtime, s.hours_remaining_to_threshold.is_some());
    let mut line = format!(
        "{} [{}] {}{}{}",
        s.employee_id,
        s.shift_type.label(),
        color,
        secs2readable(s.worked_seconds, true),
        RESET
    );

    if s.is_on_break {
        line.push_str(&format!(
            "  ☕ on break {}",
            secs2readable(s.current_break_seconds, true)
        ));
    }
    if s.is_overtime {
        line.push_str(&format!("  overtime +{} min", s.overtime_minutes));
    } else if let Some(left) = s.hours_remaining_to_threshold {
        line.push_str(&format!("  {} to go", hours2readable(left)));
    }

    line
}
