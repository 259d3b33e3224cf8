// Settings service module
// Loads and saves the TOML configuration file

mod service;

pub use service::{default_config_path, default_database_path, SettingsService};
