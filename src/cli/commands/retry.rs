use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Retry { employee } = cmd {
        let engine = open_engine(cfg)?;
        let applied = engine.retry_pending_scores(employee)?;
        let employee = employee.trim();

        if applied.is_empty() {
            info(format!("No pending scores for {}", employee));
            return Ok(());
        }

        for o in &applied {
            println!("  session #{} on {}: {:.2}", o.session_id, o.date, o.final_score);
        }
        success(format!("{} pending score(s) applied for {}", applied.len(), employee));
        audit_event(
            cfg,
            "retry",
            employee,
            &format!("{} pending score(s) applied", applied.len()),
        );
    }

    Ok(())
}
