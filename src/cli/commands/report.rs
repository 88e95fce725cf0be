use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date::{month_year, parse_month};
use crate::utils::formatting::hours2readable;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        employee,
        month,
        json,
    } = cmd
    {
        let month_key = match month {
            Some(m) => Some(month_year(parse_month(m)?.0)),
            None => None,
        };
        let employee = employee.as_deref().map(str::trim);

        let engine = open_engine(cfg)?;
        let records = engine.records(employee, month_key.as_deref())?;

        if *json {
            let out = serde_json::to_string_pretty(&records).map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        if records.is_empty() {
            info("No performance records found");
            return Ok(());
        }

        header(match &month_key {
            Some(m) => format!("Performance report {}", m),
            None => "Performance report".to_string(),
        });

        let mut table = Table::new(vec![
            Column::left("Employee"),
            Column::left("Month"),
            Column::right("Days"),
            Column::right("Delay"),
            Column::right("Overtime"),
            Column::right("Avg score"),
            Column::right("Punctuality"),
            Column::left("Status"),
        ]);
        for r in &records {
            table.add_row(vec![
                r.employee_id.clone(),
                r.month_year.clone(),
                r.total_working_days.to_string(),
                format!("{} min", r.total_delay_minutes),
                hours2readable(r.total_overtime_hours),
                format!("{:.2}", r.average_performance_score),
                format!("{:.2}%", r.punctuality_percentage),
                r.performance_status.label().to_string(),
            ]);
        }

        // header and rule first, then one line per record
        for (i, line) in table.render().lines().enumerate() {
            match i.checked_sub(2).and_then(|idx| records.get(idx)) {
                Some(r) => println!("{}{}{}", color_for_status(r.performance_status), line, RESET),
                None => println!("{}", line),
            }
        }
    }

    Ok(())
}
