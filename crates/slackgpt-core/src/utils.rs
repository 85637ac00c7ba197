//! Utility helpers — data path and clock.

use std::path::PathBuf;

/// Get the slackgpt data directory (e.g. `~/.slackgpt/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".slackgpt")
}

/// Current Unix time in whole seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
