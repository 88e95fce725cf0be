use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::shift::ShiftType;
use crate::ui::messages::success;
use crate::utils::date::parse_date;

/// Handle `assign <employee> <date> (--shift | --day-off)`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Assign {
        employee,
        date,
        shift,
        day_off,
    } = cmd
    {
        let d = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
        let engine = open_engine(cfg)?;
        let assignment = engine.assign_shift(employee, d, shift.map(ShiftType::from), *day_off)?;

        let what = match assignment.shift_ref {
            Some(s) if !assignment.is_day_off => format!("{} shift", s.label()),
            _ => "day off".to_string(),
        };
        success(format!("{} on {}: {}", assignment.employee_id, d, what));
        audit_event(cfg, "assign", &format!("{}@{}", assignment.employee_id, d), &what);
    }

    Ok(())
}

/// Handle `assign-month <employee> <YYYY-MM> --shift`
pub fn handle_month(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::AssignMonth {
        employee,
        month,
        shift,
    } = cmd
    {
        let kind = ShiftType::from(*shift);
        let engine = open_engine(cfg)?;
        engine.assign_month(employee, month, kind)?;

        let employee = employee.trim();
        success(format!(
            "{} defaults to the {} shift in {}",
            employee,
            kind.label(),
            month
        ));
        audit_event(
            cfg,
            "assign_month",
            &format!("{}@{}", employee, month),
            &format!("{} shift", kind.label()),
        );
    }

    Ok(())
}
