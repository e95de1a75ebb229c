mod date;
mod engine;
mod state;

pub use date::{days_between, DateKey};
pub use engine::{
    clamp_flower_threshold, compute_decay, compute_flower_count, compute_streak, mark_complete,
    parse_flower_threshold, snapshot, undo, Completion, Undone,
};
pub(crate) use engine::parse_leading_int;
pub use state::{HabitSnapshot, HabitState, DEFAULT_FLOWER_THRESHOLD, MAX_FLOWERS};
