use crate::cli::commands::checkout::print_closed;
use crate::cli::commands::status::render;
use crate::cli::commands::{audit_event, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Tick loop: refresh the employee's clock and run the daily boundary when
/// its instant passes.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { employee, ticks } = cmd {
        let employee = employee.trim();
        let engine = open_engine(cfg)?;
        let tick = Duration::from_secs(cfg.tick_seconds.max(1));

        let mut next_boundary = engine.boundary().next_boundary(chrono::Local::now().naive_local());
        let mut n: u64 = 0;

        loop {
            let now = chrono::Local::now().naive_local();

            if now >= next_boundary {
                debug!(at = %next_boundary, "boundary reached");
                for c in engine.run_boundary(now)? {
                    print_closed(&c);
                    audit_event(
                        cfg,
                        c.delta.kind.as_str(),
                        &c.session.employee_id,
                        &format!("Session #{} force-closed at boundary", c.session.id),
                    );
                }
                next_boundary = engine.boundary().next_boundary(now);
            }

            match engine.live_state(employee, now)? {
                Some(state) => println!("{}", render(&state)),
                None => {
                    info(format!("{} has no open work session", employee));
                    return Ok(());
                }
            }

            n += 1;
            if ticks.is_some_and(|max| n >= max) {
                return Ok(());
            }
            thread::sleep(tick);
        }
    }

    Ok(())
}
