//! Habit tracker: the caller layer between a [`StateStore`] and the engine.
//!
//! Each operation reads a fresh snapshot from the store, runs one engine
//! transition and writes the result back before returning its [`Event`].
//! A renderer therefore only ever animates state that is already saved.

use tracing::debug;

use crate::error::Result;
use crate::events::Event;
use crate::habit::{
    compute_decay, compute_flower_count, compute_streak, days_between, mark_complete,
    parse_flower_threshold, snapshot, undo, Completion, DateKey, HabitSnapshot, HabitState,
};
use crate::storage::codec::{self, KEY_DECAY_CHECKED};
use crate::storage::{Config, StateStore};

pub struct HabitTracker<S: StateStore> {
    store: S,
    default_threshold: u32,
}

impl<S: StateStore> HabitTracker<S> {
    /// Track the habit stored in `store`. `default_threshold` applies while
    /// the store has no flower threshold of its own.
    pub fn new(store: S, default_threshold: u32) -> Self {
        Self {
            store,
            default_threshold: default_threshold.max(1),
        }
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self::new(store, config.habit.default_flower_threshold)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current persisted state.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn state(&self) -> Result<HabitState> {
        codec::read_state(&self.store, self.default_threshold)
    }

    /// Apply decay for days missed since the last completion.
    ///
    /// Missed days are counted from the later of the last completion and the
    /// last day decay was evaluated, so loading again on the same day costs
    /// nothing. History is left alone even when leaves are lost.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn load(&mut self, today: DateKey) -> Result<Event> {
        let state = self.state()?;
        let Some(last) = state.last_completed else {
            return Ok(Event::StateLoaded {
                leaves: state.leaves,
                at: today,
            });
        };

        let checked = codec::read_date(&self.store, KEY_DECAY_CHECKED)?;
        let since = checked.map_or(last, |c| c.max(last));
        let days_missed = days_between(since, today);
        if days_missed <= 0 {
            return Ok(Event::StateLoaded {
                leaves: state.leaves,
                at: today,
            });
        }

        let leaves_after = compute_decay(Some(since), today, state.leaves);
        if leaves_after != state.leaves {
            codec::write_leaves(&mut self.store, leaves_after)?;
        }
        codec::write_date(&mut self.store, KEY_DECAY_CHECKED, Some(today))?;

        debug!(
            %since,
            %today,
            days_missed,
            leaves_before = state.leaves,
            leaves_after,
            "applied decay for missed days"
        );
        Ok(Event::DecayApplied {
            days_missed: u32::try_from(days_missed).unwrap_or(u32::MAX),
            leaves_before: state.leaves,
            leaves_after,
            at: today,
        })
    }

    /// Mark the habit done for `today`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn complete(&mut self, today: DateKey) -> Result<Event> {
        let state = self.state()?;
        match mark_complete(&state, today) {
            Completion::Recorded(next) => {
                codec::write_state(&mut self.store, &next)?;
                let streak = compute_streak(&next.history, today);
                debug!(%today, leaves = next.leaves, streak, "habit completed");
                Ok(Event::HabitCompleted {
                    leaves: next.leaves,
                    streak,
                    at: today,
                })
            }
            Completion::AlreadyCompleted => Ok(Event::AlreadyCompleted { at: today }),
        }
    }

    /// Undo the most recent completion.
    ///
    /// # Errors
    /// Returns [`EngineError::NothingToUndo`](crate::EngineError::NothingToUndo)
    /// when the history is empty, or a store error.
    pub fn undo(&mut self) -> Result<Event> {
        let state = self.state()?;
        let done = undo(&state)?;
        codec::write_state(&mut self.store, &done.state)?;
        debug!(removed = %done.removed, leaves = done.state.leaves, "completion undone");
        Ok(Event::CompletionUndone {
            removed: done.removed,
            leaves: done.state.leaves,
            last_completed: done.state.last_completed,
        })
    }

    /// Change the number of leaves per flower from raw user input.
    ///
    /// Invalid input is clamped rather than rejected.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn set_flower_threshold(&mut self, input: &str) -> Result<Event> {
        let threshold = parse_flower_threshold(input, self.default_threshold);
        codec::write_flower_threshold(&mut self.store, threshold)?;
        let leaves = codec::read_leaves(&self.store)?;
        debug!(input, threshold, "flower threshold changed");
        Ok(Event::FlowerThresholdChanged {
            flower_threshold: threshold,
            flowers: compute_flower_count(leaves, threshold),
        })
    }

    /// Display values for `today`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn snapshot(&self, today: DateKey) -> Result<HabitSnapshot> {
        Ok(snapshot(&self.state()?, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, EngineError};
    use crate::storage::codec::{KEY_HISTORY, KEY_LAST, KEY_LEAVES};
    use crate::storage::MemoryStore;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn tracker() -> HabitTracker<MemoryStore> {
        HabitTracker::new(MemoryStore::new(), 7)
    }

    #[test]
    fn first_load_on_empty_store_is_quiet() {
        let mut t = tracker();
        let event = t.load(key("2024-01-10")).unwrap();
        assert_eq!(
            event,
            Event::StateLoaded {
                leaves: 0,
                at: key("2024-01-10")
            }
        );
        assert!(t.store().is_empty());
    }

    #[test]
    fn complete_persists_before_returning() {
        let mut t = tracker();
        let event = t.complete(key("2024-01-10")).unwrap();
        assert_eq!(
            event,
            Event::HabitCompleted {
                leaves: 1,
                streak: 1,
                at: key("2024-01-10")
            }
        );
        let store = t.store();
        assert_eq!(store.get(KEY_LEAVES).unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(KEY_LAST).unwrap().as_deref(), Some("2024-01-10"));
        assert_eq!(store.get(KEY_HISTORY).unwrap().as_deref(), Some(r#"["2024-01-10"]"#));
    }

    #[test]
    fn completing_twice_reports_already_completed() {
        let mut t = tracker();
        t.complete(key("2024-01-10")).unwrap();
        let event = t.complete(key("2024-01-10")).unwrap();
        assert_eq!(event, Event::AlreadyCompleted { at: key("2024-01-10") });
        assert_eq!(t.state().unwrap().leaves, 1);
    }

    #[test]
    fn load_decays_for_missed_days_once() {
        let mut store = MemoryStore::new();
        store.set(KEY_LEAVES, "5").unwrap();
        store.set(KEY_LAST, "2024-01-10").unwrap();
        store.set(KEY_HISTORY, r#"["2024-01-10"]"#).unwrap();
        let mut t = HabitTracker::new(store, 7);

        let event = t.load(key("2024-01-13")).unwrap();
        assert_eq!(
            event,
            Event::DecayApplied {
                days_missed: 3,
                leaves_before: 5,
                leaves_after: 2,
                at: key("2024-01-13")
            }
        );
        // reloading the same day costs nothing more
        assert!(matches!(t.load(key("2024-01-13")).unwrap(), Event::StateLoaded { leaves: 2, .. }));
        // the next day costs exactly one more leaf
        assert!(matches!(
            t.load(key("2024-01-14")).unwrap(),
            Event::DecayApplied { days_missed: 1, leaves_after: 1, .. }
        ));

        let state = t.state().unwrap();
        assert_eq!(state.history, vec![key("2024-01-10")]);
        assert_eq!(state.last_completed, Some(key("2024-01-10")));
    }

    #[test]
    fn undo_after_same_day_load_does_not_redecay() {
        let mut t = tracker();
        t.complete(key("2024-01-09")).unwrap();
        t.complete(key("2024-01-10")).unwrap();
        t.load(key("2024-01-13")).unwrap();
        t.complete(key("2024-01-13")).unwrap();
        t.undo().unwrap();
        assert!(matches!(t.load(key("2024-01-13")).unwrap(), Event::StateLoaded { .. }));
    }

    #[test]
    fn undo_on_empty_history_is_rejected_without_writes() {
        let mut t = tracker();
        let err = t.undo().unwrap_err();
        assert!(matches!(err, CoreError::Engine(EngineError::NothingToUndo)));
        assert!(t.store().is_empty());
    }

    #[test]
    fn undo_removes_last_entry() {
        let mut t = tracker();
        t.complete(key("2024-01-09")).unwrap();
        t.complete(key("2024-01-10")).unwrap();
        let event = t.undo().unwrap();
        assert_eq!(
            event,
            Event::CompletionUndone {
                removed: key("2024-01-10"),
                leaves: 1,
                last_completed: Some(key("2024-01-09")),
            }
        );
    }

    #[test]
    fn undo_of_only_entry_removes_last_key() {
        let mut t = tracker();
        t.complete(key("2024-01-10")).unwrap();
        t.undo().unwrap();
        assert!(t.store().get(KEY_LAST).unwrap().is_none());
        assert_eq!(t.state().unwrap(), HabitState::with_threshold(7));
    }

    #[test]
    fn threshold_changes_are_clamped() {
        let mut t = tracker();
        for day in ["2024-01-08", "2024-01-09", "2024-01-10"] {
            t.complete(key(day)).unwrap();
        }
        assert_eq!(
            t.set_flower_threshold("1").unwrap(),
            Event::FlowerThresholdChanged {
                flower_threshold: 1,
                flowers: 3
            }
        );
        assert!(matches!(
            t.set_flower_threshold("-2").unwrap(),
            Event::FlowerThresholdChanged { flower_threshold: 1, .. }
        ));
        assert!(matches!(
            t.set_flower_threshold("").unwrap(),
            Event::FlowerThresholdChanged { flower_threshold: 7, flowers: 0 }
        ));
    }

    #[test]
    fn config_default_threshold_applies_until_set() {
        let mut config = Config::default();
        config.habit.default_flower_threshold = 2;
        let mut t = HabitTracker::with_config(MemoryStore::new(), &config);
        t.complete(key("2024-01-09")).unwrap();
        t.complete(key("2024-01-10")).unwrap();
        let snap = t.snapshot(key("2024-01-10")).unwrap();
        assert_eq!(snap.flower_threshold, 2);
        assert_eq!(snap.flowers, 1);
        assert_eq!(snap.streak, 2);
    }
}
