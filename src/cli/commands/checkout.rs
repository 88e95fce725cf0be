use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::engine::ClosedSession;
use crate::core::clock::current_worked_seconds;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::formatting::{hours2readable, secs2readable};
use crate::utils::time::parse_optional_at;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkout { employee, at } = cmd {
        let at = parse_optional_at(at.as_ref())?;
        let engine = open_engine(cfg)?;

        let closed = match engine.check_out(employee, at) {
            Ok(c) => c,
            Err(e) if e.is_recoverable() => {
                warning(format!(
                    "Session closed but not scored; run `rworkclock retry {}`",
                    employee.trim()
                ));
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if closed.outcome.forced {
            warning(format!(
                "Session #{} ran past the daily boundary and was closed there",
                closed.session.id
            ));
        }
        print_closed(&closed);
        audit_event(
            cfg,
            closed.delta.kind.as_str(),
            &closed.session.employee_id,
            &format!(
                "Session #{} closed, score {:.2}",
                closed.session.id, closed.outcome.final_score
            ),
        );
    }

    Ok(())
}

/// Summary of a scored close, shared with the boundary command.
pub(crate) fn print_closed(closed: &ClosedSession) {
    let s = &closed.session;
    let o = &closed.outcome;
    let until = s.check_out.unwrap_or(s.check_in);

    success(format!(
        "{} checked out at {} (session #{})",
        s.employee_id,
        until.format("%Y-%m-%d %H:%M"),
        s.id
    ));
    println!("  Worked     : {}", secs2readable(current_worked_seconds(s, until), false));
    println!("  Required   : {}", hours2readable(o.required_hours));
    println!("  Delay      : {} min", o.delay_minutes);
    println!("  Overtime   : {}", hours2readable(o.overtime_hours));
    println!(
        "  Score      : {:.2} ({}{}{})",
        o.final_score,
        color_for_status(o.status),
        o.status.label(),
        RESET
    );
    info(format!(
        "{} month-to-date: {} day(s), average {:.2}, punctuality {:.2}%",
        closed.record.month_year,
        closed.record.total_working_days,
        closed.record.average_performance_score,
        closed.record.punctuality_percentage
    ));
}
