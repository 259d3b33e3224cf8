use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "licenses.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "LicenseKeeper", "license-keeper")
}

/// `<config dir>/config.toml`, or `./config.toml` when no home directory is known.
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        dirs.config_dir().join(CONFIG_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for config");
        PathBuf::from(CONFIG_FILE)
    }
}

/// `<data dir>/licenses.db`, or `./licenses.db` when no home directory is known.
pub fn default_database_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        dirs.data_dir().join(DATABASE_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for database");
        PathBuf::from(DATABASE_FILE)
    }
}

/// Reads and writes [`Settings`] as TOML at a fixed path.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields the defaults; a file that does
    /// not parse or validate is an error.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::debug!("No config at {}; using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {}", self.path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        Ok(settings)
    }

    /// Write settings, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create dir {}", parent.display()))?;
            }
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))?;
        Ok(())
    }

    /// Resolved database location: the configured path or the platform default.
    pub fn database_path(settings: &Settings) -> PathBuf {
        settings
            .database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let service = SettingsService::new(temp_dir.path().join("config.toml"));

        assert_eq!(service.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let service = SettingsService::new(temp_dir.path().join("nested").join("config.toml"));

        let settings = Settings {
            database_path: Some(temp_dir.path().join("custom.db")),
            reminder_time: "08:15".to_string(),
            notifications_enabled: false,
            poll_interval_seconds: 30,
        };
        service.save(&settings).unwrap();

        assert_eq!(service.load().unwrap(), settings);
    }

    #[test]
    fn test_write_defaults_creates_editable_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("license-keeper").join("config.toml");
        let service = SettingsService::new(&path);
        assert_eq!(service.path(), path.as_path());

        let defaults = service.load().unwrap();
        service.save(&defaults).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("reminder_time = \"09:00\""));
        assert!(written.contains("poll_interval_seconds = 60"));
        assert_eq!(service.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "reminder_time = \"07:45\"\n").unwrap();

        let settings = SettingsService::new(&path).load().unwrap();
        assert_eq!(settings.reminder_time, "07:45");
        assert!(settings.notifications_enabled);
        assert_eq!(settings.poll_interval_seconds, 60);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "reminder_time = [").unwrap();

        assert!(SettingsService::new(&path).load().is_err());
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "reminder_time = \"25:00\"\n").unwrap();

        let err = SettingsService::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }

    #[test]
    fn test_database_path_prefers_configured_value() {
        let settings = Settings {
            database_path: Some(PathBuf::from("/tmp/elsewhere.db")),
            ..Settings::default()
        };
        assert_eq!(
            SettingsService::database_path(&settings),
            PathBuf::from("/tmp/elsewhere.db")
        );
        assert!(SettingsService::database_path(&Settings::default()).ends_with(DATABASE_FILE));
    }
}
