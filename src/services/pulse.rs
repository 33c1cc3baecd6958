// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pulse lifecycle service: create, invite-accept, goal edits, leave,
//! delete.
//!
//! Progress semantics live in the engine; this service wires them to
//! Firestore state and hands score events back to the caller.

use std::sync::Arc;

use crate::clock::Clock;
use crate::db::FirestoreDb;
use crate::engine::score::{apply_award, AwardOutcome, ScoreAward};
use crate::engine::{self, goals};
use crate::error::{AppError, Result};
use crate::models::{ExerciseGoal, Participant, Pulse};

/// Pulse lifecycle operations.
#[derive(Clone)]
pub struct PulseService {
    db: FirestoreDb,
    clock: Arc<dyn Clock>,
}

/// Inputs for creating a pulse.
#[derive(Debug, Clone)]
pub struct NewPulse {
    pub name: String,
    pub description: String,
    pub routine_id: u64,
    pub invited_ids: Vec<u64>,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

/// Goal selection when joining or editing participation: either explicit
/// goals or a percentage stretch over the routine's baselines.
#[derive(Debug, Clone)]
pub enum GoalChoice {
    Explicit(Vec<ExerciseGoal>),
    ScaleBaseline { percent: u32 },
    Baseline,
}

impl PulseService {
    pub fn new(db: FirestoreDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Create a pulse. The creator becomes the first participant with
    /// empty goals; they pick goals through the goal editor afterwards.
    pub async fn create(&self, creator_id: u64, new: NewPulse) -> Result<(Pulse, AwardOutcome)> {
        if new.start_date > new.end_date {
            return Err(AppError::BadRequest(
                "Pulse start date is after its end date".to_string(),
            ));
        }
        if self.db.get_routine(new.routine_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Routine {} not found",
                new.routine_id
            )));
        }

        let pulse_id = self.clock.now().timestamp_millis() as u64;
        let mut pulse = Pulse {
            id: pulse_id,
            name: new.name,
            description: new.description,
            creator_id,
            participants: Vec::new(),
            invited_ids: new.invited_ids,
            member_ids: Vec::new(),
            routine_ids: vec![new.routine_id],
            streak: 0,
            last_streak_date: None,
            start_date: new.start_date,
            end_date: new.end_date,
        };
        pulse.add_participant(Participant::new(creator_id, Some(new.routine_id), vec![]));

        self.db.upsert_pulse(&pulse).await?;
        let award = self.award(creator_id, ScoreAward::PulseCreated).await?;

        tracing::info!(pulse_id, creator_id, "Pulse created");
        Ok((pulse, award))
    }

    /// Accept an invite: the invitee becomes a participant with their
    /// chosen goals against one of the pulse's routines.
    pub async fn accept_invite(
        &self,
        pulse_id: u64,
        user_id: u64,
        routine_id: u64,
        choice: GoalChoice,
    ) -> Result<(Pulse, AwardOutcome)> {
        let mut pulse = self.get(pulse_id).await?;

        if !pulse.is_invited(user_id) {
            return Err(AppError::Forbidden(
                "No pending invite for this pulse".to_string(),
            ));
        }
        if pulse.is_member(user_id) {
            return Err(AppError::Conflict("Already a participant".to_string()));
        }

        let goals = self.resolve_goals(&pulse, routine_id, choice).await?;

        pulse.invited_ids.retain(|id| *id != user_id);
        pulse.add_participant(Participant::new(user_id, Some(routine_id), goals));

        self.db.upsert_pulse(&pulse).await?;
        let award = self.award(user_id, ScoreAward::PulseJoined).await?;

        tracing::info!(pulse_id, user_id, "Pulse invite accepted");
        Ok((pulse, award))
    }

    /// Edit a participant's goals, optionally switching to another routine
    /// registered on the pulse. Switching resets progress and the cached
    /// logs; a same-routine edit re-scores the cache against the new
    /// goals.
    pub async fn update_goals(
        &self,
        pulse_id: u64,
        user_id: u64,
        routine_id: u64,
        choice: GoalChoice,
    ) -> Result<Pulse> {
        let mut pulse = self.get(pulse_id).await?;

        let participant = pulse
            .participant(user_id)
            .cloned()
            .ok_or_else(|| AppError::Forbidden("Not a participant of this pulse".to_string()))?;

        let goals = self.resolve_goals(&pulse, routine_id, choice).await?;
        let routine = self
            .db
            .get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", routine_id)))?;

        let updated = engine::apply_goal_change(&participant, goals, routine_id, &routine);
        if let Some(slot) = pulse.participant_mut(user_id) {
            *slot = updated;
        }

        self.db.upsert_pulse(&pulse).await?;
        tracing::info!(pulse_id, user_id, routine_id, "Pulse goals updated");
        Ok(pulse)
    }

    /// Register another routine on the pulse so participants can switch
    /// to it.
    pub async fn add_routine(&self, pulse_id: u64, user_id: u64, routine_id: u64) -> Result<Pulse> {
        let mut pulse = self.get(pulse_id).await?;

        if !pulse.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this pulse".to_string(),
            ));
        }
        if self.db.get_routine(routine_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Routine {} not found",
                routine_id
            )));
        }

        if !pulse.routine_ids.contains(&routine_id) {
            pulse.routine_ids.push(routine_id);
            self.db.upsert_pulse(&pulse).await?;
        }
        Ok(pulse)
    }

    /// Leave a pulse. A pulse left by its last participant is deleted.
    pub async fn leave(&self, pulse_id: u64, user_id: u64) -> Result<()> {
        let mut pulse = self.get(pulse_id).await?;

        if !pulse.is_member(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this pulse".to_string(),
            ));
        }

        pulse.remove_participant(user_id);
        if pulse.participants.is_empty() {
            self.db.delete_pulse(pulse_id).await?;
            tracing::info!(pulse_id, user_id, "Last participant left; pulse deleted");
        } else {
            self.db.upsert_pulse(&pulse).await?;
            tracing::info!(pulse_id, user_id, "Left pulse");
        }
        Ok(())
    }

    /// Delete a pulse. Only its creator may do this.
    pub async fn delete(&self, pulse_id: u64, user_id: u64) -> Result<()> {
        let pulse = self.get(pulse_id).await?;

        if pulse.creator_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can delete a pulse".to_string(),
            ));
        }

        self.db.delete_pulse(pulse_id).await?;
        tracing::info!(pulse_id, user_id, "Pulse deleted");
        Ok(())
    }

    async fn get(&self, pulse_id: u64) -> Result<Pulse> {
        self.db
            .get_pulse(pulse_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pulse {} not found", pulse_id)))
    }

    /// Resolve a goal choice against a routine registered on the pulse.
    async fn resolve_goals(
        &self,
        pulse: &Pulse,
        routine_id: u64,
        choice: GoalChoice,
    ) -> Result<Vec<ExerciseGoal>> {
        if !pulse.routine_ids.contains(&routine_id) {
            return Err(AppError::BadRequest(
                "Routine is not registered on this pulse".to_string(),
            ));
        }

        match choice {
            GoalChoice::Explicit(goals) => Ok(goals),
            GoalChoice::Baseline => {
                let routine = self
                    .db
                    .get_routine(routine_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Routine {} not found", routine_id))
                    })?;
                Ok(goals::goals_from_routine(&routine))
            }
            GoalChoice::ScaleBaseline { percent } => {
                if !goals::SCALE_PRESETS.contains(&percent) {
                    return Err(AppError::BadRequest(format!(
                        "Unsupported scale percent: {}",
                        percent
                    )));
                }
                let routine = self
                    .db
                    .get_routine(routine_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Routine {} not found", routine_id))
                    })?;
                Ok(goals::scale_goals(&routine, percent))
            }
        }
    }

    /// Read-modify-write a score award onto a user.
    async fn award(&self, user_id: u64, award: ScoreAward) -> Result<AwardOutcome> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let outcome = apply_award(user.score, award);
        user.score = outcome.new_score;
        self.db.upsert_user(&user).await?;
        Ok(outcome)
    }
}
