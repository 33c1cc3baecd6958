// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::clock::Clock;
use crate::engine::events::{LevelUp, ScoreEvent};
use crate::engine::levels::level_for_score;
use crate::engine::score::{apply_award, revoke_follower_award, ScoreAward};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ExerciseGoal, Pulse, Routine, SetLog, WorkoutDay, WorkoutLog};
use crate::services::pulse::{GoalChoice, NewPulse};
use crate::services::WorkoutReport;
use crate::AppState;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/account", delete(delete_account))
        .route("/api/routines", get(list_routines).post(create_routine))
        .route(
            "/api/routines/{id}",
            get(get_routine).put(update_routine).delete(delete_routine),
        )
        .route(
            "/api/routines/{id}/follow",
            post(follow_routine).delete(unfollow_routine),
        )
        .route("/api/pulses", get(list_pulses).post(create_pulse))
        .route("/api/pulses/{id}", get(get_pulse).delete(delete_pulse))
        .route("/api/pulses/{id}/accept", post(accept_invite))
        .route("/api/pulses/{id}/goals", put(update_goals))
        .route("/api/pulses/{id}/routines", post(add_pulse_routine))
        .route("/api/pulses/{id}/leave", post(leave_pulse))
        .route(
            "/api/pulses/{id}/logs",
            get(get_pulse_logs).post(submit_workout),
        )
}

fn default_is_public() -> bool {
    true
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response. Never echoes the phone number or PIN.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub is_public: bool,
    pub score: u32,
    /// Name of the level tier the score maps to
    pub level: &'static str,
    pub current_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub achievements: Vec<String>,
    pub followed_routine_ids: Vec<u64>,
    pub active_routine_ids: Vec<u64>,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserResponse {
        id: profile.id,
        username: profile.username,
        display_name: profile.display_name,
        bio: profile.bio,
        photo_url: profile.photo_url,
        is_public: profile.is_public,
        score: profile.score,
        level: level_for_score(profile.score).name,
        current_streak: profile.current_streak,
        last_activity_date: profile.last_activity_date,
        achievements: profile
            .achievements
            .unlocked_keys()
            .map(str::to_string)
            .collect(),
        followed_routine_ids: profile.followed_routine_ids,
        active_routine_ids: profile.active_routine_ids,
    }))
}

// ─── Account Deletion ────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteAccountResponse {
    pub deleted_documents: usize,
}

/// Delete the account and all associated data.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = user.user_id, "User-initiated account deletion");

    let deleted_documents = state.db.delete_user_data(user.user_id).await?;

    Ok(Json(DeleteAccountResponse { deleted_documents }))
}

// ─── Routines ────────────────────────────────────────────────

#[derive(Deserialize)]
struct RoutinesQuery {
    /// "mine" (default) or "public"
    #[serde(default)]
    scope: Option<String>,
}

const PUBLIC_ROUTINES_LIMIT: u32 = 50;

/// List the caller's routines, or the public explore feed.
async fn list_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RoutinesQuery>,
) -> Result<Json<Vec<Routine>>> {
    let routines = match query.scope.as_deref() {
        None | Some("mine") => state.db.list_routines_by_owner(user.user_id).await?,
        Some("public") => state.db.list_public_routines(PUBLIC_ROUTINES_LIMIT).await?,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown routines scope: {}",
                other
            )))
        }
    };
    Ok(Json(routines))
}

#[derive(Deserialize, Validate)]
pub struct RoutineRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

#[derive(Serialize)]
pub struct RoutineCreatedResponse {
    pub routine: Routine,
    pub score_event: ScoreEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUp>,
}

/// Create a routine (+2 score for the author).
async fn create_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RoutineRequest>,
) -> Result<Json<RoutineCreatedResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let routine = Routine {
        id: state.clock.now().timestamp_millis() as u64,
        owner_id: user.user_id,
        name: payload.name,
        description: payload.description,
        followers: 0,
        is_public: payload.is_public,
        days: payload.days,
    };
    state.db.upsert_routine(&routine).await?;

    let mut author = state
        .db
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    let outcome = apply_award(author.score, ScoreAward::RoutineCreated);
    author.score = outcome.new_score;
    state.db.upsert_user(&author).await?;

    tracing::info!(routine_id = routine.id, owner_id = user.user_id, "Routine created");

    Ok(Json(RoutineCreatedResponse {
        routine,
        score_event: outcome.event,
        level_up: outcome.level_up,
    }))
}

/// Fetch a routine. Private routines are visible only to their owner.
async fn get_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<Routine>> {
    let routine = state
        .db
        .get_routine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    if !routine.is_public && routine.owner_id != user.user_id {
        return Err(AppError::Forbidden("Routine is private".to_string()));
    }
    Ok(Json(routine))
}

/// Replace a routine's content. Follower count is preserved.
async fn update_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(payload): Json<RoutineRequest>,
) -> Result<Json<Routine>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = state
        .db
        .get_routine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    if existing.owner_id != user.user_id {
        return Err(AppError::Forbidden(
            "Only the owner can edit a routine".to_string(),
        ));
    }

    let routine = Routine {
        id,
        owner_id: existing.owner_id,
        name: payload.name,
        description: payload.description,
        followers: existing.followers,
        is_public: payload.is_public,
        days: payload.days,
    };
    state.db.upsert_routine(&routine).await?;
    Ok(Json(routine))
}

/// Delete a routine (owner only).
async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let routine = state
        .db
        .get_routine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    if routine.owner_id != user.user_id {
        return Err(AppError::Forbidden(
            "Only the owner can delete a routine".to_string(),
        ));
    }

    state.db.delete_routine(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub followers: u32,
}

/// Follow a routine. The author earns +2 score (their toast is not
/// deliverable from here; the score still updates).
async fn follow_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<FollowResponse>> {
    let mut me = state
        .db
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    let mut routine = state
        .db
        .get_routine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    if me.followed_routine_ids.contains(&id) {
        return Err(AppError::Conflict("Already following".to_string()));
    }

    me.followed_routine_ids.push(id);
    routine.followers += 1;
    state.db.upsert_user(&me).await?;
    state.db.upsert_routine(&routine).await?;

    if routine.owner_id != user.user_id {
        if let Some(mut owner) = state.db.get_user(routine.owner_id).await? {
            let outcome = apply_award(owner.score, ScoreAward::RoutineFollowed);
            owner.score = outcome.new_score;
            state.db.upsert_user(&owner).await?;
        }
    }

    Ok(Json(FollowResponse {
        followers: routine.followers,
    }))
}

/// Unfollow a routine; also deactivates it. The author's follower award is
/// taken back, saturating at zero.
async fn unfollow_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<FollowResponse>> {
    let mut me = state
        .db
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;
    let mut routine = state
        .db
        .get_routine(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    if !me.followed_routine_ids.contains(&id) {
        return Err(AppError::Conflict("Not following".to_string()));
    }

    me.followed_routine_ids.retain(|rid| *rid != id);
    me.active_routine_ids.retain(|rid| *rid != id);
    routine.followers = routine.followers.saturating_sub(1);
    state.db.upsert_user(&me).await?;
    state.db.upsert_routine(&routine).await?;

    if routine.owner_id != user.user_id {
        if let Some(mut owner) = state.db.get_user(routine.owner_id).await? {
            owner.score = revoke_follower_award(owner.score);
            state.db.upsert_user(&owner).await?;
        }
    }

    Ok(Json(FollowResponse {
        followers: routine.followers,
    }))
}

// ─── Pulses ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PulseListResponse {
    pub member: Vec<Pulse>,
    pub invited: Vec<Pulse>,
}

/// Pulses the caller participates in, plus pending invites.
async fn list_pulses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PulseListResponse>> {
    let member = state.db.list_pulses_for_member(user.user_id).await?;
    let invited = state.db.list_pulses_inviting(user.user_id).await?;
    Ok(Json(PulseListResponse { member, invited }))
}

#[derive(Deserialize, Validate)]
pub struct CreatePulseRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub routine_id: u64,
    #[serde(default)]
    pub invited_ids: Vec<u64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
pub struct PulseMutationResponse {
    pub pulse: Pulse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_event: Option<ScoreEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUp>,
}

/// Create a pulse (+7 score; the creator is the first participant).
async fn create_pulse(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePulseRequest>,
) -> Result<Json<PulseMutationResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (pulse, award) = state
        .pulses
        .create(
            user.user_id,
            NewPulse {
                name: payload.name,
                description: payload.description,
                routine_id: payload.routine_id,
                invited_ids: payload.invited_ids,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;

    Ok(Json(PulseMutationResponse {
        pulse,
        score_event: Some(award.event),
        level_up: award.level_up,
    }))
}

/// Fetch a pulse. Visible to participants and invitees.
async fn get_pulse(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<Pulse>> {
    let pulse = state
        .db
        .get_pulse(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pulse {} not found", id)))?;

    if !pulse.is_member(user.user_id) && !pulse.is_invited(user.user_id) {
        return Err(AppError::Forbidden(
            "Not a participant of this pulse".to_string(),
        ));
    }
    Ok(Json(pulse))
}

/// Delete a pulse (creator only).
async fn delete_pulse(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    state.pulses.delete(id, user.user_id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

/// Goal selection when accepting an invite or editing participation:
/// explicit goals win over a percentage stretch; neither means baseline.
#[derive(Deserialize)]
pub struct GoalSelectionRequest {
    pub routine_id: u64,
    #[serde(default)]
    pub goals: Option<Vec<ExerciseGoal>>,
    #[serde(default)]
    pub scale_percent: Option<u32>,
}

impl GoalSelectionRequest {
    fn into_choice(self) -> (u64, GoalChoice) {
        let choice = match (self.goals, self.scale_percent) {
            (Some(goals), _) => GoalChoice::Explicit(goals),
            (None, Some(percent)) => GoalChoice::ScaleBaseline { percent },
            (None, None) => GoalChoice::Baseline,
        };
        (self.routine_id, choice)
    }
}

/// Accept a pulse invite (+7 score).
async fn accept_invite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(payload): Json<GoalSelectionRequest>,
) -> Result<Json<PulseMutationResponse>> {
    let (routine_id, choice) = payload.into_choice();
    let (pulse, award) = state
        .pulses
        .accept_invite(id, user.user_id, routine_id, choice)
        .await?;

    Ok(Json(PulseMutationResponse {
        pulse,
        score_event: Some(award.event),
        level_up: award.level_up,
    }))
}

/// Edit goals or switch routine within a pulse.
async fn update_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(payload): Json<GoalSelectionRequest>,
) -> Result<Json<Pulse>> {
    let (routine_id, choice) = payload.into_choice();
    let pulse = state
        .pulses
        .update_goals(id, user.user_id, routine_id, choice)
        .await?;
    Ok(Json(pulse))
}

#[derive(Deserialize)]
pub struct AddRoutineRequest {
    pub routine_id: u64,
}

/// Register another routine on the pulse.
async fn add_pulse_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(payload): Json<AddRoutineRequest>,
) -> Result<Json<Pulse>> {
    let pulse = state
        .pulses
        .add_routine(id, user.user_id, payload.routine_id)
        .await?;
    Ok(Json(pulse))
}

/// Leave a pulse.
async fn leave_pulse(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    state.pulses.leave(id, user.user_id).await?;
    Ok(Json(serde_json::json!({ "status": "left" })))
}

// ─── Workout Logs ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitWorkoutRequest {
    pub sets: Vec<SetLog>,
}

/// Submit today's logged sets for a pulse.
async fn submit_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(payload): Json<SubmitWorkoutRequest>,
) -> Result<Json<WorkoutReport>> {
    let report = state.workouts.submit(user.user_id, id, payload.sets).await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
struct LogsQuery {
    /// Defaults to today
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct PulseLogsResponse {
    pub date: NaiveDate,
    pub logs: Vec<WorkoutLog>,
}

/// Submissions in a pulse for one date (participants only).
async fn get_pulse_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<PulseLogsResponse>> {
    let pulse = state
        .db
        .get_pulse(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pulse {} not found", id)))?;

    if !pulse.is_member(user.user_id) {
        return Err(AppError::Forbidden(
            "Not a participant of this pulse".to_string(),
        ));
    }

    let date = query.date.unwrap_or_else(|| state.clock.today());
    let logs = state.db.logs_for_pulse_on(id, date).await?;

    Ok(Json(PulseLogsResponse { date, logs }))
}
