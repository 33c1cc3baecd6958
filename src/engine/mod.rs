// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure progress, streak, scoring and level computations.
//!
//! Everything in this module is a synchronous transformation over
//! in-memory snapshots. Callers (the db and service layers) read state,
//! invoke these functions with an explicitly injected date, and write the
//! results back. The only ordering guarantees required — at most one
//! streak increment per calendar day, per user and per pulse — are
//! enforced by the date-equality guards at the top of the advance
//! functions, not by locking.

pub mod events;
pub mod goals;
pub mod levels;
pub mod progress;
pub mod score;
pub mod streak;

pub use events::{LevelUp, MilestoneClass, ScoreEvent, StreakMilestone};
pub use progress::{
    apply_goal_change, apply_logged_sets, exercise_contribution, recompute_progress, LogSummary,
};
pub use streak::{
    advance_personal_streak, advance_pulse_streak, PersonalStreakAdvance, PulseStreakAdvance,
    PULSE_STREAK_QUORUM,
};
