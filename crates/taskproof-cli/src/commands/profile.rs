use clap::Subcommand;
use taskproof_core::storage::Database;

use crate::common;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a new profile
    Create {
        /// Profile name
        name: String,
    },
    /// List profiles
    List,
    /// Switch the active profile
    Use {
        /// Profile name
        name: String,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProfileAction::Create { name } => {
            if db.get_profile(&name)?.is_some() {
                return Err(format!("profile already exists: {name}").into());
            }
            let profile = db.create_profile(&name)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::List => {
            let profiles = db.list_profiles()?;
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
        ProfileAction::Use { name } => {
            common::set_active_profile(&db, &name)?;
            eprintln!("Active profile: {name}");
        }
    }
    Ok(())
}
