// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, streaks, scores)
//! - Routines (baseline exercise targets)
//! - Pulses (competitions with embedded participants)
//! - Workout logs (one document per pulse/user/day)
//!
//! The workout submission path goes through a single Firestore
//! transaction so the pulse streak, participant progress and personal
//! streak can never drift apart under concurrent submitters.

use std::collections::HashSet;

use chrono::NaiveDate;
use futures_util::{stream, StreamExt};

use crate::db::collections;
use crate::engine;
use crate::engine::events::{LevelUp, ScoreEvent};
use crate::engine::levels;
use crate::engine::progress::LogSummary;
use crate::engine::streak::{PersonalStreakAdvance, PulseStreakAdvance};
use crate::error::AppError;
use crate::models::{Pulse, Routine, User, WorkoutLog};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by login phone number.
    pub async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, AppError> {
        let phone = phone.to_string();
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("phone").eq(phone.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.pop())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.id.to_string())
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Routine Operations ──────────────────────────────────────

    /// Get a routine by ID.
    pub async fn get_routine(&self, routine_id: u64) -> Result<Option<Routine>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ROUTINES)
            .obj()
            .one(&routine_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a routine.
    pub async fn upsert_routine(&self, routine: &Routine) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ROUTINES)
            .document_id(routine.id.to_string())
            .object(routine)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a routine.
    pub async fn delete_routine(&self, routine_id: u64) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ROUTINES)
            .document_id(routine_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List routines owned by a user.
    pub async fn list_routines_by_owner(&self, owner_id: u64) -> Result<Vec<Routine>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ROUTINES)
            .filter(move |q| q.field("owner_id").eq(owner_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List public routines for the explore view.
    pub async fn list_public_routines(&self, limit: u32) -> Result<Vec<Routine>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ROUTINES)
            .filter(|q| q.field("is_public").eq(true))
            .order_by([(
                "followers",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Pulse Operations ────────────────────────────────────────

    /// Get a pulse by ID.
    pub async fn get_pulse(&self, pulse_id: u64) -> Result<Option<Pulse>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PULSES)
            .obj()
            .one(&pulse_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a pulse.
    pub async fn upsert_pulse(&self, pulse: &Pulse) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PULSES)
            .document_id(pulse.id.to_string())
            .object(pulse)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a pulse.
    pub async fn delete_pulse(&self, pulse_id: u64) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PULSES)
            .document_id(pulse_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List pulses the user participates in.
    pub async fn list_pulses_for_member(&self, user_id: u64) -> Result<Vec<Pulse>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PULSES)
            .filter(move |q| q.field("member_ids").array_contains(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pulses with a pending invite for the user.
    pub async fn list_pulses_inviting(&self, user_id: u64) -> Result<Vec<Pulse>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PULSES)
            .filter(move |q| q.field("invited_ids").array_contains(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Workout Log Operations ──────────────────────────────────

    /// All submissions in a pulse on the given date.
    pub async fn logs_for_pulse_on(
        &self,
        pulse_id: u64,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutLog>, AppError> {
        let date = date.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("pulse_id").eq(pulse_id),
                    q.field("date").eq(date.clone()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Distinct users with a submission in a pulse on the given date.
    pub async fn distinct_loggers_on(
        &self,
        pulse_id: u64,
        date: NaiveDate,
    ) -> Result<HashSet<u64>, AppError> {
        let logs = self.logs_for_pulse_on(pulse_id, date).await?;
        Ok(logs.into_iter().map(|log| log.user_id).collect())
    }

    // ─── Atomic Workout Submission ───────────────────────────────

    /// Atomically commit a workout submission: write the log document,
    /// fold the submission into the participant's progress, and advance
    /// the personal and pulse streaks.
    ///
    /// All three writes go through one Firestore transaction. If another
    /// submitter touches the same pulse concurrently, Firestore retries
    /// with fresh data, so the streak/date stamp can never double-apply.
    ///
    /// `distinct_loggers_today` must already include the current
    /// submitter; the caller queries it before entering the transaction.
    pub async fn submit_workout_atomic(
        &self,
        log: &WorkoutLog,
        routine: &Routine,
        distinct_loggers_today: usize,
        today: NaiveDate,
    ) -> Result<SubmittedWorkout, AppError> {
        let pulse_id = log.pulse_id;
        let user_id = log.user_id;

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // 1. Read the pulse and user within the transaction scope so the
        //    commit conflicts with concurrent writers.
        let pulse: Option<Pulse> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PULSES)
            .obj()
            .one(&pulse_id.to_string())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read pulse in transaction: {}", e))
            })?;

        let Some(mut pulse) = pulse else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("Pulse {} not found", pulse_id)));
        };

        let user: Option<User> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_id.to_string())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read user in transaction: {}", e))
            })?;

        let Some(mut user) = user else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        };

        let Some(participant) = pulse.participant(user_id).cloned() else {
            let _ = transaction.rollback().await;
            return Err(AppError::BadRequest(format!(
                "User {} is not a participant of pulse {}",
                user_id, pulse_id
            )));
        };

        // 2. Fold the submission into the participant.
        let (updated_participant, summary) =
            engine::apply_logged_sets(&participant, &log.sets, routine);
        if let Some(slot) = pulse.participant_mut(user_id) {
            *slot = updated_participant;
        }

        // 3. Personal streak + bonuses.
        let old_score = user.score;
        let mut score = user.score;
        let mut score_events = Vec::new();

        let personal = engine::advance_personal_streak(
            user.current_streak,
            user.last_activity_date,
            &user.achievements,
            today,
        );
        if let Some(advance) = &personal {
            user.current_streak = advance.streak;
            user.last_activity_date = Some(advance.last_activity_date);
            user.achievements = advance.ledger.clone();
            for bonus in &advance.bonuses {
                score += bonus.points;
                score_events.push(ScoreEvent {
                    points: bonus.points,
                    message: bonus.message.clone(),
                    new_total: score,
                });
            }
        }
        user.score = score;
        let level_up = levels::level_up(old_score, score);

        // 4. Pulse streak under the quorum rule.
        let pulse_streak = engine::advance_pulse_streak(
            pulse.streak,
            pulse.last_streak_date,
            distinct_loggers_today,
            today,
        );
        if let Some(advance) = &pulse_streak {
            pulse.streak = advance.streak;
            pulse.last_streak_date = Some(advance.last_streak_date);
        }

        // 5. Stage all three writes and commit.
        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::WORKOUT_LOGS)
            .document_id(log.document_id())
            .object(log)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add log to transaction: {}", e)))?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::PULSES)
            .document_id(pulse.id.to_string())
            .object(&pulse)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add pulse to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user.id.to_string())
            .object(&user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add user to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            pulse_id,
            user_id,
            progress = summary.progress,
            pulse_streak = pulse.streak,
            personal_streak = user.current_streak,
            "Workout submission committed"
        );

        Ok(SubmittedWorkout {
            summary,
            personal,
            pulse_streak,
            score_events,
            level_up,
        })
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Data Deletion ────────────────────────────────────────

    /// Delete ALL data for a user (account deletion).
    ///
    /// Removes:
    /// - their workout logs
    /// - their routines
    /// - their participant entries in pulses (empty pulses are deleted)
    /// - `users/{id}`
    ///
    /// Returns the number of documents deleted or updated.
    pub async fn delete_user_data(&self, user_id: u64) -> Result<usize, AppError> {
        let mut touched_count = 0;

        // 1. Delete all workout logs by this user
        let logs: Vec<WorkoutLog> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_LOGS)
            .filter(move |q| q.field("user_id").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = logs.len();
        self.batch_delete(&logs, collections::WORKOUT_LOGS, |log: &WorkoutLog| {
            log.document_id()
        })
        .await?;
        touched_count += count;
        tracing::debug!(user_id, count, "Deleted workout logs");

        // 2. Delete routines they own
        let routines = self.list_routines_by_owner(user_id).await?;
        let count = routines.len();
        self.batch_delete(&routines, collections::ROUTINES, |routine: &Routine| {
            routine.id.to_string()
        })
        .await?;
        touched_count += count;
        tracing::debug!(user_id, count, "Deleted routines");

        // 3. Drop them from pulses they participate in. Pulses with no one
        //    left are deleted rather than kept as empty shells.
        let pulses = self.list_pulses_for_member(user_id).await?;
        let count = pulses.len();

        stream::iter(pulses)
            .map(|mut pulse| {
                let db = self.clone();
                async move {
                    pulse.remove_participant(user_id);
                    if pulse.participants.is_empty() {
                        db.delete_pulse(pulse.id).await
                    } else {
                        db.upsert_pulse(&pulse).await
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        touched_count += count;
        tracing::debug!(user_id, count, "Updated pulse memberships");

        // 4. Delete user profile
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        touched_count += 1;

        tracing::info!(user_id, touched_count, "User data deletion complete");

        Ok(touched_count)
    }
}

/// Everything that changed when a workout submission was committed.
#[derive(Debug, Clone)]
pub struct SubmittedWorkout {
    pub summary: LogSummary,
    pub personal: Option<PersonalStreakAdvance>,
    pub pulse_streak: Option<PulseStreakAdvance>,
    pub score_events: Vec<ScoreEvent>,
    pub level_up: Option<LevelUp>,
}
