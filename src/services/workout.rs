// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout submission service.
//!
//! Handles the core workflow:
//! 1. Validate the pulse, membership, and the competition window
//! 2. Load the participant's selected routine (the progress baseline)
//! 3. Count distinct loggers today for the pulse streak quorum
//! 4. Commit log + progress + streaks in one Firestore transaction
//! 5. Assemble the emitted events for the response

use std::sync::Arc;

use serde::Serialize;

use crate::clock::{format_utc_rfc3339, Clock};
use crate::db::FirestoreDb;
use crate::engine::events::{LevelUp, ScoreEvent, StreakMilestone};
use crate::error::{AppError, Result};
use crate::models::{SetLog, WorkoutLog};

/// Processes workout submissions against a pulse.
#[derive(Clone)]
pub struct WorkoutProcessor {
    db: FirestoreDb,
    clock: Arc<dyn Clock>,
}

impl WorkoutProcessor {
    pub fn new(db: FirestoreDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Submit today's logged sets for a pulse.
    pub async fn submit(
        &self,
        user_id: u64,
        pulse_id: u64,
        sets: Vec<SetLog>,
    ) -> Result<WorkoutReport> {
        let today = self.clock.today();
        tracing::info!(user_id, pulse_id, set_count = sets.len(), "Processing workout submission");

        let pulse = self
            .db
            .get_pulse(pulse_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pulse {} not found", pulse_id)))?;

        let participant = pulse
            .participant(user_id)
            .ok_or_else(|| AppError::Forbidden("Not a participant of this pulse".to_string()))?;

        if !pulse.is_active_on(today) {
            return Err(AppError::BadRequest(
                "Pulse is not active today".to_string(),
            ));
        }

        let routine_id = participant.selected_routine_id.ok_or_else(|| {
            AppError::BadRequest("No routine selected for this pulse".to_string())
        })?;

        let routine = self
            .db
            .get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", routine_id)))?;

        // Quorum input: everyone who logged today, plus this submission.
        // The read happens before the transaction; the streak's date stamp
        // inside the transaction is what prevents double-advances.
        let mut loggers = self.db.distinct_loggers_on(pulse_id, today).await?;
        loggers.insert(user_id);

        let log = WorkoutLog {
            pulse_id,
            user_id,
            date: today,
            sets,
            recorded_at: format_utc_rfc3339(self.clock.now()),
        };

        let submitted = self
            .db
            .submit_workout_atomic(&log, &routine, loggers.len(), today)
            .await?;

        let mut milestones = Vec::new();
        if let Some(personal) = &submitted.personal {
            if let Some(milestone) = &personal.milestone {
                milestones.push(milestone.clone());
            }
        }
        if let Some(advance) = &submitted.pulse_streak {
            if let Some(days) = advance.milestone_days {
                milestones.push(StreakMilestone::Pulse {
                    days,
                    pulse_name: pulse.name.clone(),
                });
            }
        }

        Ok(WorkoutReport {
            progress: submitted.summary.progress,
            matched_exercises: submitted.summary.matched_exercises,
            personal_streak: submitted
                .personal
                .as_ref()
                .map(|advance| advance.streak),
            pulse_streak: submitted
                .pulse_streak
                .as_ref()
                .map(|advance| advance.streak),
            milestones,
            score_events: submitted.score_events,
            level_up: submitted.level_up,
        })
    }
}

/// Result of a workout submission, returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutReport {
    /// Participant progress after the submission (0–100)
    pub progress: f64,
    /// Exercises in the submission that matched a goal
    pub matched_exercises: usize,
    /// New personal streak, when it advanced today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_streak: Option<u32>,
    /// New pulse streak, when the quorum advanced it today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_streak: Option<u32>,
    pub milestones: Vec<StreakMilestone>,
    pub score_events: Vec<ScoreEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUp>,
}
