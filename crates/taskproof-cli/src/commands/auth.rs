//! AI credential management.
//!
//! The OpenAI API key lives in the OS keyring; the `OPENAI_API_KEY`
//! environment variable works as a fallback at verification time.

use clap::Subcommand;
use taskproof_core::verify::keyring_store;
use taskproof_core::verify::openai::{API_KEY_ENTRY, API_KEY_ENV};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the OpenAI API key in the OS keyring
    SetKey {
        /// The API key
        key: String,
    },
    /// Remove the stored API key
    ClearKey,
    /// Show whether a credential is available
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            if key.trim().is_empty() {
                return Err("refusing to store an empty key".into());
            }
            keyring_store::set(API_KEY_ENTRY, &key)?;
            eprintln!("API key stored");
        }
        AuthAction::ClearKey => {
            keyring_store::delete(API_KEY_ENTRY)?;
            eprintln!("API key cleared");
        }
        AuthAction::Status => {
            let in_keyring = keyring_store::get(API_KEY_ENTRY)
                .ok()
                .flatten()
                .is_some();
            let in_env = std::env::var(API_KEY_ENV)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            println!(
                "{}",
                serde_json::json!({ "keyring": in_keyring, "env": in_env })
            );
        }
    }
    Ok(())
}
