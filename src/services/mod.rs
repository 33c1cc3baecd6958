// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod pulse;
pub mod workout;

pub use pulse::PulseService;
pub use workout::{WorkoutProcessor, WorkoutReport};
