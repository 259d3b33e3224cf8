// Settings module
// User-editable configuration persisted as TOML

use std::path::PathBuf;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Application settings loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Wall-clock time reminders fire at, as `HH:MM`. Reminders already
    /// scheduled keep their old time until the next reschedule.
    pub reminder_time: String,
    pub notifications_enabled: bool,
    pub poll_interval_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            reminder_time: "09:00".to_string(),
            notifications_enabled: true,
            poll_interval_seconds: 60,
        }
    }
}

impl Settings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), String> {
        self.reminder_time()?;

        if self.poll_interval_seconds == 0 {
            return Err("Poll interval must be at least one second".to_string());
        }

        Ok(())
    }

    /// The parsed reminder time of day.
    pub fn reminder_time(&self) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(&self.reminder_time, "%H:%M").map_err(|_| {
            format!(
                "Invalid reminder time '{}'. Expected HH:MM (24-hour)",
                self.reminder_time
            )
        })
    }
}
