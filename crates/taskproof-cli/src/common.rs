//! Shared CLI helpers.

use taskproof_core::storage::{Database, Profile};

const ACTIVE_PROFILE_KEY: &str = "active_profile";
const DEFAULT_PROFILE: &str = "default";

/// Resolve the active profile, creating the default one on first use.
///
/// Selection lives in the kv store so `profile use` survives across
/// invocations.
pub fn active_profile(db: &Database) -> Result<Profile, Box<dyn std::error::Error>> {
    let name = db
        .kv_get(ACTIVE_PROFILE_KEY)?
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    if let Some(profile) = db.get_profile(&name)? {
        return Ok(profile);
    }
    if name == DEFAULT_PROFILE {
        return Ok(db.create_profile(DEFAULT_PROFILE)?);
    }
    Err(format!("active profile '{name}' no longer exists; run `taskproof profile use`").into())
}

/// Persist the active profile selection.
pub fn set_active_profile(db: &Database, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db.get_profile(name)?.is_none() {
        return Err(format!("no such profile: {name}").into());
    }
    db.kv_set(ACTIVE_PROFILE_KEY, name)?;
    Ok(())
}
