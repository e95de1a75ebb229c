//! # Habit Tree Core Library
//!
//! Business logic for Habit Tree, a daily habit tracker that grows a tree.
//! Each completed day adds a leaf, every missed day drops one, and enough
//! leaves earn a flower. The CLI and any graphical front end are thin
//! callers over this library.
//!
//! ## Architecture
//!
//! - **Habit Engine**: pure transitions (complete, undo, decay) and derived
//!   values (streak, flower count) over an explicit [`HabitState`]
//! - **Storage**: a [`StateStore`] key-value seam with SQLite and in-memory
//!   implementations, plus TOML-based configuration
//! - **Tracker**: loads state, runs one transition, saves, emits an [`Event`]
//! - **Layout**: deterministic leaf and flower placements for renderers
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: read-modify-write driver over a store
//! - [`Database`]: SQLite key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod layout;
pub mod storage;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, EngineError, ValidationError};
pub use events::Event;
pub use habit::{
    clamp_flower_threshold, compute_decay, compute_flower_count, compute_streak, days_between,
    mark_complete, parse_flower_threshold, undo, Completion, DateKey, HabitSnapshot, HabitState,
    Undone, DEFAULT_FLOWER_THRESHOLD, MAX_FLOWERS,
};
pub use layout::{flower_placements, leaf_placements, FlowerPlacement, LeafPlacement, TreeLayout};
pub use storage::{Config, Database, MemoryStore, StateStore};
pub use tracker::HabitTracker;
