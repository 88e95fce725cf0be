use crate::core::engine::EngineConfig;
use crate::errors::{AppError, AppResult};
use crate::models::shift::{ScheduledShift, ShiftCatalog};
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_time;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// One shift definition as written in the config file (`HH:MM` times).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub name: String,
    pub start: String,
    pub end: String,
    pub required_hours: f64,
}

impl ShiftConfig {
    fn to_scheduled(&self) -> AppResult<ScheduledShift> {
        let start_time = parse_time(&self.start).ok_or_else(|| AppError::InvalidTime(self.start.clone()))?;
        let end_time = parse_time(&self.end).ok_or_else(|| AppError::InvalidTime(self.end.clone()))?;
        if self.required_hours.is_nan() || self.required_hours <= 0.0 {
            return Err(AppError::Config(format!(
                "required_hours for shift '{}' must be positive",
                self.name
            )));
        }
        Ok(ScheduledShift {
            name: self.name.clone(),
            start_time,
            end_time,
            required_hours: self.required_hours,
        })
    }
}

fn default_day_shift() -> ShiftConfig {
    ShiftConfig {
        name: "Day".to_string(),
        start: "09:00".to_string(),
        end: "16:00".to_string(),
        required_hours: 7.0,
    }
}

fn default_night_shift() -> ShiftConfig {
    ShiftConfig {
        name: "Night".to_string(),
        start: "16:00".to_string(),
        end: "04:00".to_string(),
        required_hours: 8.0,
    }
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

fn default_boundary_hour() -> u32 {
    4
}

fn default_heuristic_fallback() -> bool {
    true
}

fn default_tick_seconds() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_day_shift")]
    pub day_shift: ShiftConfig,
    #[serde(default = "default_night_shift")]
    pub night_shift: ShiftConfig,
    #[serde(default = "default_boundary_hour")]
    pub boundary_hour: u32,
    #[serde(default = "default_heuristic_fallback")]
    pub heuristic_fallback: bool,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            day_shift: default_day_shift(),
            night_shift: default_night_shift(),
            boundary_hour: default_boundary_hour(),
            heuristic_fallback: default_heuristic_fallback(),
            tick_seconds: default_tick_seconds(),
        }
    }

    /// `~/.rworkclock`, or the working directory when no home is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rworkclock")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rworkclock.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rworkclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            debug!(error = %e, "config parse failed");
            AppError::ConfigLoad
        })
    }

    /// Create the config directory, the config file (unless `is_test`) and
    /// an empty database file. Returns the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_name {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() || is_test { p } else { dir.join(p) }
            }
            None => dir.join("rworkclock.sqlite"),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Self::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn catalog(&self) -> AppResult<ShiftCatalog> {
        Ok(ShiftCatalog {
            day: self.day_shift.to_scheduled()?,
            night: self.night_shift.to_scheduled()?,
        })
    }

    pub fn engine_config(&self) -> AppResult<EngineConfig> {
        Ok(EngineConfig {
            catalog: self.catalog()?,
            boundary_hour: self.boundary_hour,
            heuristic_fallback: self.heuristic_fallback,
        })
    }

    /// Keys absent from the file text; they load with their defaults.
    pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|_| AppError::ConfigLoad)?;
        let keys = [
            "database",
            "day_shift",
            "night_shift",
            "boundary_hour",
            "heuristic_fallback",
            "tick_seconds",
        ];
        Ok(keys
            .into_iter()
            .filter(|k| value.get(*k).is_none())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn defaults_match_standard_shifts() {
        let cfg = Config::with_database(PathBuf::from("/tmp/x.sqlite"));
        let catalog = cfg.catalog().unwrap();
        assert_eq!(catalog, ShiftCatalog::default());
        assert_eq!(cfg.engine_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_file_is_filled_with_defaults() {
        let yaml = "database: /tmp/a.sqlite\nboundary_hour: 5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.boundary_hour, 5);
        assert!(cfg.heuristic_fallback);
        assert_eq!(cfg.tick_seconds, 1);
        assert_eq!(cfg.night_shift.end, "04:00");

        let missing = Config::missing_keys(yaml).unwrap();
        assert_eq!(
            missing,
            vec!["day_shift", "night_shift", "heuristic_fallback", "tick_seconds"]
        );
    }

    #[test]
    fn custom_shift_times_are_parsed() {
        let mut cfg = Config::with_database(PathBuf::from("/tmp/x.sqlite"));
        cfg.day_shift.start = "08:30".into();
        let catalog = cfg.catalog().unwrap();
        assert_eq!(catalog.day.start_time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());

        cfg.night_shift.end = "25:00".into();
        assert!(matches!(cfg.catalog(), Err(AppError::InvalidTime(_))));
    }
}
