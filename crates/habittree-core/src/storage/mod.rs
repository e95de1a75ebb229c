pub mod codec;
mod config;
pub mod database;
mod store;

pub use config::{Config, HabitConfig};
pub use database::Database;
pub use store::{MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/habittree[-dev]/` based on HABITTREE_ENV.
///
/// Set HABITTREE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITTREE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habittree-dev")
    } else {
        base_dir.join("habittree")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
