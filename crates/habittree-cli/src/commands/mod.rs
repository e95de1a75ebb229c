pub mod config;
pub mod habit;

use std::path::PathBuf;

use habittree_core::storage::data_dir;
use habittree_core::{Config, DateKey, Database, HabitTracker};

/// Where state lives and which day it is, resolved once per invocation.
pub struct Context {
    pub data_dir: PathBuf,
    pub today: DateKey,
}

impl Context {
    pub fn resolve(
        data_dir_override: Option<PathBuf>,
        today: Option<DateKey>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = match data_dir_override {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => data_dir()?,
        };
        Ok(Self {
            data_dir,
            today: today.unwrap_or_else(DateKey::today),
        })
    }

    pub fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        Ok(Config::load_in(&self.data_dir)?)
    }

    pub fn tracker(&self) -> Result<HabitTracker<Database>, Box<dyn std::error::Error>> {
        let config = self.config()?;
        let db = Database::open_in(&self.data_dir)?;
        Ok(HabitTracker::with_config(db, &config))
    }
}
