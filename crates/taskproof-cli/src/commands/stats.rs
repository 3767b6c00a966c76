use clap::Subcommand;
use taskproof_core::storage::Database;

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Active profile's points and streaks
    Me,
    /// Top profiles by points
    Leaderboard {
        /// Number of rows
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Me => {
            let profile = common::active_profile(&db)?;
            let stats = db.stats(profile.id)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Leaderboard { limit } => {
            let board = db.leaderboard(limit)?;
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
    }
    Ok(())
}
