use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Replay { employee, month } = cmd {
        let engine = open_engine(cfg)?;
        let record = engine.replay_month(employee, month)?;

        success(format!(
            "{} {} rebuilt: {} day(s), average {:.2}, punctuality {:.2}%, {}",
            record.employee_id,
            record.month_year,
            record.total_working_days,
            record.average_performance_score,
            record.punctuality_percentage,
            record.performance_status.label()
        ));
        audit_event(
            cfg,
            "replay",
            &format!("{}@{}", record.employee_id, record.month_year),
            "Monthly record rebuilt",
        );
    }

    Ok(())
}
