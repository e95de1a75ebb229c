//! Reading and writing [`HabitState`] through a [`StateStore`].
//!
//! Persisted values are plain strings. Anything unreadable is recovered to
//! its default with a warning rather than failing the load.

use tracing::warn;

use super::store::StateStore;
use crate::error::Result;
use crate::habit::{parse_flower_threshold, parse_leading_int, DateKey, HabitState};

pub const KEY_LEAVES: &str = "habitTree_leaves";
pub const KEY_LAST: &str = "habitTree_last";
pub const KEY_HISTORY: &str = "habitTree_history";
pub const KEY_FLOWER_EVERY: &str = "habitTree_flower_every";
/// Last day decay was evaluated on load.
pub const KEY_DECAY_CHECKED: &str = "habitTree_decay_checked";

/// Read the habit state, filling absent or corrupt values with defaults.
///
/// The last completion date always follows the final history entry. A stored
/// date that disagrees with the history is replaced with a warning.
pub fn read_state<S: StateStore + ?Sized>(store: &S, default_threshold: u32) -> Result<HabitState> {
    let history = read_history(store)?;
    let stored_last = read_date(store, KEY_LAST)?;
    let last_completed = history.last().copied();
    if stored_last != last_completed {
        warn!(
            stored = ?stored_last.map(|d| d.to_string()),
            history_last = ?last_completed.map(|d| d.to_string()),
            "last completion date disagrees with history, using history"
        );
    }
    Ok(HabitState {
        leaves: read_leaves(store)?,
        last_completed,
        history,
        flower_threshold: read_flower_threshold(store, default_threshold)?,
    })
}

/// Persist every field of `state`.
pub fn write_state<S: StateStore + ?Sized>(store: &mut S, state: &HabitState) -> Result<()> {
    write_leaves(store, state.leaves)?;
    write_history(store, &state.history)?;
    write_date(store, KEY_LAST, state.last_completed)?;
    write_flower_threshold(store, state.flower_threshold)
}

pub fn read_leaves<S: StateStore + ?Sized>(store: &S) -> Result<u32> {
    let Some(raw) = store.get(KEY_LEAVES)? else {
        return Ok(0);
    };
    let leaves = match parse_leading_int(&raw) {
        Some(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        None => {
            warn!(value = %raw, "unreadable leaf count, starting from 0");
            0
        }
    };
    Ok(leaves)
}

pub fn write_leaves<S: StateStore + ?Sized>(store: &mut S, leaves: u32) -> Result<()> {
    store.set(KEY_LEAVES, &leaves.to_string())
}

pub fn read_history<S: StateStore + ?Sized>(store: &S) -> Result<Vec<DateKey>> {
    let Some(raw) = store.get(KEY_HISTORY)? else {
        return Ok(Vec::new());
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "corrupt completion history, treating as empty");
            return Ok(Vec::new());
        }
    };

    let history = entries
        .into_iter()
        .filter_map(|entry| {
            let parsed = entry.as_str().and_then(|s| s.parse::<DateKey>().ok());
            if parsed.is_none() {
                warn!(entry = %entry, "dropping unreadable history entry");
            }
            parsed
        })
        .collect();
    Ok(history)
}

pub fn write_history<S: StateStore + ?Sized>(store: &mut S, history: &[DateKey]) -> Result<()> {
    let json = serde_json::to_string(history)?;
    store.set(KEY_HISTORY, &json)
}

pub fn read_date<S: StateStore + ?Sized>(store: &S, key: &str) -> Result<Option<DateKey>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.parse::<DateKey>() {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable date");
            Ok(None)
        }
    }
}

/// Write `date` under `key`, or remove the key when there is no date.
pub fn write_date<S: StateStore + ?Sized>(
    store: &mut S,
    key: &str,
    date: Option<DateKey>,
) -> Result<()> {
    match date {
        Some(date) => store.set(key, &date.to_string()),
        None => store.remove(key),
    }
}

pub fn read_flower_threshold<S: StateStore + ?Sized>(store: &S, default: u32) -> Result<u32> {
    let raw = store.get(KEY_FLOWER_EVERY)?.unwrap_or_default();
    Ok(parse_flower_threshold(&raw, default))
}

pub fn write_flower_threshold<S: StateStore + ?Sized>(store: &mut S, threshold: u32) -> Result<()> {
    store.set(KEY_FLOWER_EVERY, &threshold.max(1).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn empty_store_reads_defaults() {
        let store = MemoryStore::new();
        let state = read_state(&store, 7).unwrap();
        assert_eq!(state, HabitState::with_threshold(7));
    }

    #[test]
    fn state_round_trips_through_store() {
        let mut store = MemoryStore::new();
        let state = HabitState {
            leaves: 3,
            last_completed: Some(key("2024-01-10")),
            history: vec![key("2024-01-09"), key("2024-01-09"), key("2024-01-10")],
            flower_threshold: 4,
        };
        write_state(&mut store, &state).unwrap();
        assert_eq!(
            store.get(KEY_HISTORY).unwrap().as_deref(),
            Some(r#"["2024-01-09","2024-01-09","2024-01-10"]"#)
        );
        assert_eq!(read_state(&store, 7).unwrap(), state);
    }

    #[test]
    fn absent_last_date_removes_the_key() {
        let mut store = MemoryStore::new();
        store.set(KEY_LAST, "2024-01-10").unwrap();
        write_date(&mut store, KEY_LAST, None).unwrap();
        assert!(store.get(KEY_LAST).unwrap().is_none());
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(KEY_HISTORY, "[\"2024-01-10\"").unwrap();
        assert!(read_history(&store).unwrap().is_empty());
        store.set(KEY_HISTORY, "{\"a\": 1}").unwrap();
        assert!(read_history(&store).unwrap().is_empty());
    }

    #[test]
    fn bad_history_entries_are_dropped() {
        let mut store = MemoryStore::new();
        store
            .set(KEY_HISTORY, r#"["2024-01-09", 5, "garbage", "2024-01-10"]"#)
            .unwrap();
        assert_eq!(
            read_history(&store).unwrap(),
            vec![key("2024-01-09"), key("2024-01-10")]
        );
    }

    #[test]
    fn leaf_count_recovers_from_bad_values() {
        let mut store = MemoryStore::new();
        store.set(KEY_LEAVES, "-3").unwrap();
        assert_eq!(read_leaves(&store).unwrap(), 0);
        store.set(KEY_LEAVES, "nope").unwrap();
        assert_eq!(read_leaves(&store).unwrap(), 0);
        store.set(KEY_LEAVES, "12").unwrap();
        assert_eq!(read_leaves(&store).unwrap(), 12);
    }

    #[test]
    fn flower_threshold_defaults_and_clamps() {
        let mut store = MemoryStore::new();
        assert_eq!(read_flower_threshold(&store, 5).unwrap(), 5);
        store.set(KEY_FLOWER_EVERY, "0").unwrap();
        assert_eq!(read_flower_threshold(&store, 5).unwrap(), 1);
        write_flower_threshold(&mut store, 0).unwrap();
        assert_eq!(store.get(KEY_FLOWER_EVERY).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn last_date_follows_history_when_they_disagree() {
        let mut store = MemoryStore::new();
        store.set(KEY_LAST, "2024-01-10").unwrap();
        store.set(KEY_HISTORY, "not json").unwrap();
        assert_eq!(read_state(&store, 7).unwrap().last_completed, None);

        store.set(KEY_HISTORY, r#"["2024-01-08","2024-01-09"]"#).unwrap();
        let state = read_state(&store, 7).unwrap();
        assert_eq!(state.last_completed, Some(key("2024-01-09")));
        assert_eq!(state.history.last().copied(), state.last_completed);

        // a history without a stored last date still yields one
        store.remove(KEY_LAST).unwrap();
        assert_eq!(read_state(&store, 7).unwrap().last_completed, Some(key("2024-01-09")));
    }

    #[test]
    fn unreadable_last_date_is_absent() {
        let mut store = MemoryStore::new();
        store.set(KEY_LAST, "yesterday").unwrap();
        assert_eq!(read_date(&store, KEY_LAST).unwrap(), None);
    }
}
