// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::NaiveDate;
use ironpulse::clock::{Clock, FixedClock};
use ironpulse::config::Config;
use ironpulse::db::FirestoreDb;
use ironpulse::routes::create_router;
use ironpulse::services::{PulseService, WorkoutProcessor};
use ironpulse::AppState;
use std::sync::Arc;

/// Date all offline test apps are pinned to.
#[allow(dead_code)]
pub const TEST_DATE: (i32, u32, u32) = (2026, 7, 1);

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Fixed clock pinned to the shared test date.
#[allow(dead_code)]
pub fn test_clock() -> Arc<FixedClock> {
    let (y, m, d) = TEST_DATE;
    Arc::new(FixedClock::at_date(
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date"),
    ))
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let clock: Arc<dyn Clock> = test_clock();

    let workouts = WorkoutProcessor::new(db.clone(), clock.clone());
    let pulses = PulseService::new(db.clone(), clock.clone());

    let state = Arc::new(AppState {
        config,
        db,
        clock,
        workouts,
        pulses,
    });

    (create_router(state.clone()), state)
}

/// Create a test JWT token (mirrors middleware::auth::create_jwt).
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, signing_key: &[u8]) -> String {
    ironpulse::middleware::auth::create_jwt(user_id, signing_key)
        .expect("Failed to create test JWT")
}
