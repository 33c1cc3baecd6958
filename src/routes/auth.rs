// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and phone/PIN login.
//!
//! The product's login is a phone number plus a 4-digit PIN. The PIN is
//! stored as entered and compared in constant time; the scheme itself is a
//! documented risk this service does not redesign.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use validator::{Validate, ValidationError};

use crate::clock::{format_utc_rfc3339, Clock};
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{AchievementLedger, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

fn validate_digits(value: &str) -> std::result::Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("digits_only"))
    }
}

/// Registration payload.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 24))]
    pub username: String,
    #[validate(length(min = 1, max = 60))]
    pub display_name: String,
    #[validate(length(min = 7, max = 15), custom(function = validate_digits))]
    pub phone: String,
    #[validate(length(equal = 4), custom(function = validate_digits))]
    pub pin: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

/// Login payload.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub pin: String,
}

/// Session issued on register/login.
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: u64,
    pub username: String,
}

/// Create a profile and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.db.find_user_by_phone(&payload.phone).await?.is_some() {
        return Err(AppError::Conflict(
            "Phone number already registered".to_string(),
        ));
    }

    let user = User {
        id: state.clock.now().timestamp_millis() as u64,
        username: payload.username,
        display_name: payload.display_name,
        bio: payload.bio,
        photo_url: None,
        phone: payload.phone,
        pin: payload.pin,
        is_public: payload.is_public,
        score: 0,
        current_streak: 0,
        last_activity_date: None,
        achievements: AchievementLedger::default(),
        followed_routine_ids: Vec::new(),
        active_routine_ids: Vec::new(),
        created_at: format_utc_rfc3339(state.clock.now()),
    };

    state.db.upsert_user(&user).await?;
    tracing::info!(user_id = user.id, "User registered");

    start_session(&state, jar, &user)
}

/// Log in with phone number + PIN.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    // Unknown phone and wrong PIN produce the same error, so responses
    // don't reveal which phones are registered.
    let user = state
        .db
        .find_user_by_phone(&payload.phone)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !pin_matches(&user.pin, &payload.pin) {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, "User logged in");
    start_session(&state, jar, &user)
}

/// End the session by clearing the cookie. The bearer token, if any, is
/// discarded client-side.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(Cookie::from(SESSION_COOKIE));
    (jar, Json(serde_json::json!({ "status": "logged_out" })))
}

fn start_session(
    state: &Arc<AppState>,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            token,
            user_id: user.id,
            username: user.username.clone(),
        }),
    ))
}

/// Constant-time PIN comparison.
///
/// PINs are short; padding both sides into fixed buffers keeps the
/// comparison independent of where a mismatch occurs.
fn pin_matches(stored: &str, supplied: &str) -> bool {
    const PAD: usize = 16;
    if stored.len() > PAD || supplied.len() > PAD {
        return false;
    }
    let mut a = [0u8; PAD];
    let mut b = [0u8; PAD];
    a[..stored.len()].copy_from_slice(stored.as_bytes());
    b[..supplied.len()].copy_from_slice(supplied.as_bytes());

    bool::from(a.ct_eq(&b)) && stored.len() == supplied.len()
}
