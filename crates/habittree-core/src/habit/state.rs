use serde::{Deserialize, Serialize};

use super::date::DateKey;

/// Leaves required per flower when nothing has been configured.
pub const DEFAULT_FLOWER_THRESHOLD: u32 = 7;

/// Display ceiling on simultaneous flower ornaments.
pub const MAX_FLOWERS: u32 = 3;

/// Persisted habit state for the single tracked habit.
///
/// The engine takes a state by reference and hands back a new one; only the
/// tracker reads it from or writes it to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitState {
    pub leaves: u32,
    pub last_completed: Option<DateKey>,
    /// Completion days in the order they were recorded. May contain
    /// duplicates and gaps.
    pub history: Vec<DateKey>,
    pub flower_threshold: u32,
}

impl HabitState {
    pub fn with_threshold(flower_threshold: u32) -> Self {
        Self {
            leaves: 0,
            last_completed: None,
            history: Vec::new(),
            flower_threshold: flower_threshold.max(1),
        }
    }

    pub fn completed_on(&self, day: DateKey) -> bool {
        self.last_completed == Some(day)
    }
}

impl Default for HabitState {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_FLOWER_THRESHOLD)
    }
}

/// Everything a renderer needs to draw the tree for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    pub today: DateKey,
    pub leaves: u32,
    pub streak: u32,
    pub last_completed: Option<DateKey>,
    pub flowers: u32,
    pub flower_threshold: u32,
    pub completed_today: bool,
}
