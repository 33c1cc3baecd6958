// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pulse (group competition) models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A participant's personal target for one exercise within a pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseGoal {
    pub exercise_id: u64,
    pub target_weight: f64,
    pub target_sets: u32,
    pub target_reps: u32,
}

/// Most recently logged numbers for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoggedStats {
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
}

/// One user's state within a pulse.
///
/// `last_logged_stats` keeps only the most recent log per exercise; it is a
/// cache, not a ledger. Full submission history lives in `workout_logs`.
/// Keys are stringified exercise IDs (Firestore map fields are string-keyed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: u64,
    #[serde(default)]
    pub selected_routine_id: Option<u64>,
    #[serde(default)]
    pub goals: Vec<ExerciseGoal>,
    /// Normalized competitive progress, 0–100. Cached for display; always
    /// re-derivable from `goals` + `last_logged_stats`.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub last_logged_stats: HashMap<String, LoggedStats>,
}

impl Participant {
    pub fn new(user_id: u64, selected_routine_id: Option<u64>, goals: Vec<ExerciseGoal>) -> Self {
        Self {
            user_id,
            selected_routine_id,
            goals,
            progress: 0.0,
            last_logged_stats: HashMap::new(),
        }
    }

    pub fn goal(&self, exercise_id: u64) -> Option<&ExerciseGoal> {
        self.goals.iter().find(|g| g.exercise_id == exercise_id)
    }

    pub fn logged_stats(&self, exercise_id: u64) -> Option<&LoggedStats> {
        self.last_logged_stats.get(&exercise_id.to_string())
    }

    /// Overwrite the cached stats for an exercise (last write wins).
    pub fn record_stats(&mut self, exercise_id: u64, stats: LoggedStats) {
        self.last_logged_stats
            .insert(exercise_id.to_string(), stats);
    }
}

/// A group competition stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    /// Numeric pulse ID (also used as document ID)
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator_id: u64,
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Users invited but not yet joined
    #[serde(default)]
    pub invited_ids: Vec<u64>,
    /// Flat mirror of `participants[].user_id`, kept for array-contains
    /// queries.
    #[serde(default)]
    pub member_ids: Vec<u64>,
    /// Routines registered on this pulse; participants pick one of these
    #[serde(default)]
    pub routine_ids: Vec<u64>,
    /// Shared streak, advanced at most once per day under the quorum rule
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_streak_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Pulse {
    pub fn participant(&self, user_id: u64) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn participant_mut(&mut self, user_id: u64) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn is_member(&self, user_id: u64) -> bool {
        self.member_ids.contains(&user_id)
    }

    pub fn is_invited(&self, user_id: u64) -> bool {
        self.invited_ids.contains(&user_id)
    }

    /// Add a participant, keeping `member_ids` in sync.
    pub fn add_participant(&mut self, participant: Participant) {
        if !self.member_ids.contains(&participant.user_id) {
            self.member_ids.push(participant.user_id);
        }
        self.participants.push(participant);
    }

    /// Remove a participant, keeping `member_ids` in sync.
    pub fn remove_participant(&mut self, user_id: u64) {
        self.participants.retain(|p| p.user_id != user_id);
        self.member_ids.retain(|id| *id != user_id);
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// One logged set of one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    pub exercise_id: u64,
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
}

/// One day's submission by one participant.
///
/// The document ID is `{pulse_id}_{user_id}_{date}`, so a same-day
/// resubmission overwrites the previous one. That also makes the
/// "distinct users who logged today" query a cheap equality filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub pulse_id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub sets: Vec<SetLog>,
    /// When this submission was recorded (RFC 3339)
    pub recorded_at: String,
}

impl WorkoutLog {
    pub fn document_id(&self) -> String {
        format!("{}_{}_{}", self.pulse_id, self.user_id, self.date)
    }
}
