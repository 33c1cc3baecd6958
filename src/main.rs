// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ironpulse API Server
//!
//! Backend for a mobile fitness social network: routines, group
//! competitions ("pulses") and the progress/streak/scoring engine.

use ironpulse::{
    clock::SystemClock,
    config::Config,
    db::FirestoreDb,
    services::{PulseService, WorkoutProcessor},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Ironpulse API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // The clock is injected so day boundaries stay simulatable in tests;
    // production always runs on the system clock.
    let clock = Arc::new(SystemClock);

    let workouts = WorkoutProcessor::new(db.clone(), clock.clone());
    let pulses = PulseService::new(db.clone(), clock.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        clock,
        workouts,
        pulses,
    });

    // Build router
    let app = ironpulse::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ironpulse=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
