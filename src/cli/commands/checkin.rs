use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::delay::delay_on_same_day;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::parse_optional_at;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { employee, at } = cmd {
        let at = parse_optional_at(at.as_ref())?;
        let engine = open_engine(cfg)?;
        let result = engine.check_in(employee, at)?;
        let s = &result.session;

        success(format!(
            "{} checked in at {} (session #{})",
            s.employee_id,
            at.format("%Y-%m-%d %H:%M"),
            s.id
        ));
        info(format!(
            "{} shift {} → {}, {}h required",
            result.shift.shift_type.label(),
            s.scheduled_start.format("%H:%M"),
            s.shift_end.format("%H:%M"),
            s.required_hours
        ));

        let delay = delay_on_same_day(s.scheduled_start.time(), s.check_in);
        if delay > 0 {
            warning(format!("Late by {} min", delay));
        }
        if result.shift.degraded {
            warning(format!(
                "Shift resolved from {} after a roster lookup problem",
                result.shift.source.to_db_str()
            ));
        }

        audit_event(
            cfg,
            result.delta.kind.as_str(),
            &s.employee_id,
            &format!("Session #{} opened ({} shift)", s.id, s.shift_type.label()),
        );
    }

    Ok(())
}
