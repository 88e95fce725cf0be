use crate::cli::commands::checkout::print_closed;
use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::time::parse_optional_at;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Boundary { at } = cmd {
        let now = parse_optional_at(at.as_ref())?;
        let engine = open_engine(cfg)?;
        let closed = engine.run_boundary(now)?;

        if closed.is_empty() {
            info(format!(
                "No session open past the {} boundary",
                engine.boundary().latest_boundary(now).format("%Y-%m-%d %H:%M")
            ));
            return Ok(());
        }

        for c in &closed {
            print_closed(c);
            audit_event(
                cfg,
                c.delta.kind.as_str(),
                &c.session.employee_id,
                &format!("Session #{} force-closed at boundary", c.session.id),
            );
        }
    }

    Ok(())
}
