// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ironpulse: backend for a mobile fitness social network.
//!
//! This crate stores user profiles, workout routines and group
//! competitions ("pulses") in Firestore, and runs the progress, streak
//! and scoring engine over them.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use clock::Clock;
use config::Config;
use db::FirestoreDb;
use services::{PulseService, WorkoutProcessor};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub clock: Arc<dyn Clock>,
    pub workouts: WorkoutProcessor,
    pub pulses: PulseService,
}
