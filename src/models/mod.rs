// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod pulse;
pub mod routine;
pub mod user;

pub use pulse::{ExerciseGoal, LoggedStats, Participant, Pulse, SetLog, WorkoutLog};
pub use routine::{ExerciseTarget, Routine, WorkoutDay};
pub use user::{AchievementLedger, User};
