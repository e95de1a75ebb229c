//! Habit engine.
//!
//! Pure transitions over [`HabitState`]. Nothing in here touches a store or
//! a clock; "today" is always passed in by the caller.
//!
//! ## Transitions
//!
//! ```text
//! NotCompletedToday --mark_complete--> CompletedToday
//! CompletedToday    --undo-----------> NotCompletedToday (one entry per call)
//! ```

use std::collections::BTreeSet;

use tracing::debug;

use super::date::{days_between, DateKey};
use super::state::{HabitSnapshot, HabitState, MAX_FLOWERS};
use crate::error::EngineError;

/// Outcome of [`mark_complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Today was appended to the history.
    Recorded(HabitState),
    /// Today was already the last completion; nothing changed.
    AlreadyCompleted,
}

/// Outcome of a successful [`undo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undone {
    pub state: HabitState,
    pub removed: DateKey,
}

/// Leaf count after one leaf is lost per missed day since `last_completed`.
///
/// Never removes more leaves than exist. A missing last date or a last date
/// that is today or later leaves the count as is.
pub fn compute_decay(last_completed: Option<DateKey>, today: DateKey, leaves: u32) -> u32 {
    let Some(last) = last_completed else {
        return leaves;
    };
    let days_missed = days_between(last, today);
    if days_missed <= 0 {
        return leaves;
    }
    let removed = u32::try_from(days_missed).unwrap_or(u32::MAX).min(leaves);
    leaves - removed
}

/// Record a completion for `today`.
pub fn mark_complete(state: &HabitState, today: DateKey) -> Completion {
    if state.completed_on(today) {
        debug!(%today, "habit already completed today");
        return Completion::AlreadyCompleted;
    }

    let mut next = state.clone();
    next.history.push(today);
    next.leaves = next.leaves.saturating_add(1);
    next.last_completed = Some(today);
    debug!(%today, leaves = next.leaves, "habit completion recorded");
    Completion::Recorded(next)
}

/// Remove the most recently recorded completion.
///
/// The leaf count drops by one whenever it is above zero, whichever day was
/// removed, so after decay the count and the history length can disagree.
pub fn undo(state: &HabitState) -> Result<Undone, EngineError> {
    let mut next = state.clone();
    let removed = next.history.pop().ok_or(EngineError::NothingToUndo)?;
    next.leaves = next.leaves.saturating_sub(1);
    next.last_completed = next.history.last().copied();
    debug!(%removed, leaves = next.leaves, "habit completion undone");
    Ok(Undone {
        state: next,
        removed,
    })
}

/// Consecutive completed days ending today.
///
/// Duplicates and ordering in `history` are irrelevant.
pub fn compute_streak(history: &[DateKey], today: DateKey) -> u32 {
    let days: BTreeSet<DateKey> = history.iter().copied().collect();
    let mut streak = 0;
    let mut cursor = today;
    while days.contains(&cursor) {
        streak += 1;
        cursor = cursor.pred();
    }
    streak
}

/// Flowers shown for a leaf count, capped at [`MAX_FLOWERS`].
pub fn compute_flower_count(leaves: u32, flower_threshold: u32) -> u32 {
    (leaves / flower_threshold.max(1)).min(MAX_FLOWERS)
}

/// Clamp any integer to a usable flower threshold (minimum 1).
pub fn clamp_flower_threshold(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Interpret user input for the flower threshold.
///
/// Blank input falls back to `default`; input without a leading number, or
/// with a number below 1, clamps to 1. Trailing garbage after the number is
/// ignored, so `"12 leaves"` reads as 12.
pub fn parse_flower_threshold(input: &str, default: u32) -> u32 {
    if input.trim().is_empty() {
        return default.max(1);
    }
    match parse_leading_int(input) {
        Some(n) => clamp_flower_threshold(n),
        None => 1,
    }
}

/// Parse an optionally signed run of leading digits, skipping leading
/// whitespace. Returns `None` when no digit is found.
pub(crate) fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Derived display values for `today`.
pub fn snapshot(state: &HabitState, today: DateKey) -> HabitSnapshot {
    HabitSnapshot {
        today,
        leaves: state.leaves,
        streak: compute_streak(&state.history, today),
        last_completed: state.last_completed,
        flowers: compute_flower_count(state.leaves, state.flower_threshold),
        flower_threshold: state.flower_threshold,
        completed_today: state.completed_on(today),
    }
}
