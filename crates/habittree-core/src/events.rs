use serde::{Deserialize, Serialize};

use crate::habit::DateKey;

/// Every state change in the tracker produces an Event.
/// Renderers use them to pick an animation; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// State was loaded and no days were missed.
    StateLoaded {
        leaves: u32,
        at: DateKey,
    },
    /// Missed days since the last completion cost leaves.
    DecayApplied {
        days_missed: u32,
        leaves_before: u32,
        leaves_after: u32,
        at: DateKey,
    },
    HabitCompleted {
        leaves: u32,
        streak: u32,
        at: DateKey,
    },
    /// Completion was requested again on a day that is already done.
    AlreadyCompleted {
        at: DateKey,
    },
    CompletionUndone {
        removed: DateKey,
        leaves: u32,
        last_completed: Option<DateKey>,
    },
    FlowerThresholdChanged {
        flower_threshold: u32,
        flowers: u32,
    },
}
