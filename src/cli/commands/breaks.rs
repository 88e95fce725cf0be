use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::{BreakAction, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::parse_optional_at;

/// Handle `break <employee> start|end`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Break {
        employee,
        action,
        at,
    } = cmd
    {
        let at = parse_optional_at(at.as_ref())?;
        let engine = open_engine(cfg)?;

        let delta = match action {
            BreakAction::Start => engine.start_break(employee, at)?,
            BreakAction::End => engine.end_break(employee, at)?,
        };

        let verb = match action {
            BreakAction::Start => "started",
            BreakAction::End => "ended",
        };
        success(format!(
            "{} break {} at {}",
            delta.employee_id,
            verb,
            at.format("%H:%M")
        ));
        audit_event(
            cfg,
            delta.kind.as_str(),
            &delta.employee_id,
            &format!("Session #{} break {}", delta.session_id, verb),
        );
    }

    Ok(())
}
