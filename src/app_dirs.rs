use directories::ProjectDirs;
use std::path::PathBuf;

/// Platform locations for the config file and the TUI log.
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "pacer")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("pacer_config.json"))
    }

    /// Log file used while the TUI owns the terminal.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("pacer")
                .join("pacer.log")
        } else {
            ProjectDirs::from("", "", "pacer")
                .map(|pd| pd.data_local_dir().join("pacer.log"))
                .unwrap_or_else(|| PathBuf::from("pacer.log"))
        }
    }
}
