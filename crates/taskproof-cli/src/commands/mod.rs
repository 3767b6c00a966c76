pub mod auth;
pub mod config;
pub mod profile;
pub mod proof;
pub mod stats;
pub mod streak;
pub mod task;
