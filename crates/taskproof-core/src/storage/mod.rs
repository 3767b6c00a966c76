pub mod config;
pub mod database;
pub mod proof_files;

pub use config::Config;
pub use database::{Database, LeaderboardEntry, Profile, ProfileStats};

use std::path::PathBuf;

/// Returns `~/.config/taskproof[-dev]/` based on TASKPROOF_ENV.
///
/// Set TASKPROOF_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKPROOF_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskproof-dev")
    } else {
        base_dir.join("taskproof")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
