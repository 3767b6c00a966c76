use clap::Subcommand;
use taskproof_core::storage::Database;

use crate::common;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Completed-task counts per day
    Calendar {
        /// Trailing window in days
        #[arg(long, default_value = "60")]
        days: u32,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let profile = common::active_profile(&db)?;

    match action {
        StreakAction::Calendar { days } => {
            let calendar = db.streak_calendar(profile.id, days)?;
            println!("{}", serde_json::to_string_pretty(&calendar)?);
        }
    }
    Ok(())
}
