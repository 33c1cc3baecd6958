// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event values emitted by the engine.
//!
//! Notification transport is out of scope for this service; events are
//! returned to the caller in HTTP responses and the client decides how to
//! celebrate.

use serde::Serialize;

use crate::engine::levels::Level;

/// A score award, with the message the client shows as a toast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEvent {
    pub points: u32,
    pub message: String,
    /// User's score after the award
    pub new_total: u32,
}

/// Personal milestone classes. The classes are mutually exclusive: a
/// multiple-of-10 day fires only `TenDay`, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneClass {
    FiveDay,
    TenDay,
}

/// Celebratory streak milestone. Non-gating: it affects nothing but the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum StreakMilestone {
    Personal { days: u32, class: MilestoneClass },
    Pulse { days: u32, pulse_name: String },
}

/// Fired when an award pushes the score across a tier boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelUp {
    pub old_level: &'static Level,
    pub new_level: &'static Level,
}
