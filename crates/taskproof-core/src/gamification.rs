//! Streak and points ledger.
//!
//! The ledger is a pure function of state + completion event: it takes
//! the user's current gamification state and the timestamp of a task
//! completion and returns the updated state. Persistence is the
//! caller's responsibility, and the caller must serialize updates per
//! user -- the ledger itself holds no shared state.
//!
//! A streak counts consecutive UTC calendar days with at least one
//! completion. Multiple completions on the same day do not inflate the
//! streak; a gap of more than one day resets it to 1. Backdated
//! completions (earlier than the last active date) also reset rather
//! than recomputing history retroactively.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Points granted for every task transitioning into the completed state.
pub const POINTS_PER_TASK: u64 = 10;

/// A user's gamification state.
///
/// Invariant: `longest_streak >= current_streak` after every ledger
/// update. Created all-zero/empty at profile creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserGameState {
    /// Last UTC calendar day with a completion, if any
    pub last_active_date: Option<NaiveDate>,
    /// Consecutive-day streak as of `last_active_date`
    pub current_streak: u32,
    /// Highest streak ever reached
    pub longest_streak: u32,
    /// Lifetime points total
    pub total_points: u64,
}

/// A single task-completion event fed into the ledger.
///
/// Transient value: it is consumed by [`StreakLedger::update`] and not
/// persisted as its own entity. An absent timestamp makes the update a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub occurred_at: Option<DateTime<Utc>>,
}

impl CompletionEvent {
    /// Event for a completion at the given instant.
    pub fn at(occurred_at: DateTime<Utc>) -> Self {
        Self {
            occurred_at: Some(occurred_at),
        }
    }

    /// Event for a completion happening now.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

/// The streak/points update algorithm.
pub struct StreakLedger;

impl StreakLedger {
    /// Apply a completion event to a gamification state.
    ///
    /// Returns the updated state; the input is not mutated. The
    /// function is total -- there are no error conditions. An event
    /// without a timestamp returns the state unchanged (explicitly, so
    /// the no-op is visible and testable rather than accidental).
    ///
    /// Streak transition on day difference from `last_active_date`:
    /// - first-ever completion: streak becomes 1
    /// - 0 days: unchanged (same-day repeats don't stack)
    /// - 1 day: streak + 1
    /// - anything else, including negative (backdated): reset to 1
    ///
    /// Points are added unconditionally on every non-no-op call; the
    /// caller must invoke this once per task entering the completed
    /// state, never for repeated completions of the same task.
    pub fn update(state: &UserGameState, event: CompletionEvent) -> UserGameState {
        let completed_at = match event.occurred_at {
            Some(ts) => ts,
            None => return state.clone(),
        };

        let completion_day = completed_at.date_naive();
        let mut next = state.clone();

        match state.last_active_date {
            None => next.current_streak = 1,
            Some(last_day) => {
                let diff = (completion_day - last_day).num_days();
                match diff {
                    0 => {}
                    1 => next.current_streak = state.current_streak + 1,
                    _ => next.current_streak = 1,
                }
            }
        }

        next.longest_streak = next.longest_streak.max(next.current_streak);
        next.last_active_date = Some(completion_day);
        next.total_points = state.total_points + POINTS_PER_TASK;

        next
    }
}
