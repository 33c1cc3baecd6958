// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak advancement: personal daily streaks and shared pulse streaks.
//!
//! Both advances start with a date-equality guard, which is what enforces
//! the "at most one increment per calendar day" invariant. There is no
//! explicit reset transition: a new day simply makes the guard pass again.

use chrono::NaiveDate;

use crate::engine::events::{MilestoneClass, StreakMilestone};
use crate::engine::score::{streak_bonuses, StreakBonus};
use crate::models::user::AchievementLedger;

/// Minimum distinct users that must log on the same day for a pulse streak
/// to advance. A competition streak requires multiple people training, not
/// one person alone.
pub const PULSE_STREAK_QUORUM: usize = 2;

/// Result of advancing a personal streak.
#[derive(Debug, Clone)]
pub struct PersonalStreakAdvance {
    pub streak: u32,
    pub last_activity_date: NaiveDate,
    /// Updated achievement ledger (one-time bonuses now marked used)
    pub ledger: AchievementLedger,
    pub milestone: Option<StreakMilestone>,
    pub bonuses: Vec<StreakBonus>,
}

/// Advance the personal streak for `today`.
///
/// Returns `None` when activity was already logged today — the caller keeps
/// the existing state and emits nothing, no matter how many workouts were
/// submitted.
pub fn advance_personal_streak(
    current_streak: u32,
    last_activity_date: Option<NaiveDate>,
    ledger: &AchievementLedger,
    today: NaiveDate,
) -> Option<PersonalStreakAdvance> {
    if last_activity_date == Some(today) {
        return None;
    }

    let streak = current_streak + 1;
    let (ledger, bonuses) = streak_bonuses(streak, ledger);

    Some(PersonalStreakAdvance {
        streak,
        last_activity_date: today,
        ledger,
        milestone: personal_milestone(streak),
        bonuses,
    })
}

/// Milestone classes are mutually exclusive: a multiple-of-10 day fires
/// only the ten-day class, not both.
fn personal_milestone(streak: u32) -> Option<StreakMilestone> {
    if streak == 0 {
        None
    } else if streak % 10 == 0 {
        Some(StreakMilestone::Personal {
            days: streak,
            class: MilestoneClass::TenDay,
        })
    } else if streak % 5 == 0 {
        Some(StreakMilestone::Personal {
            days: streak,
            class: MilestoneClass::FiveDay,
        })
    } else {
        None
    }
}

/// Result of advancing a pulse's shared streak.
#[derive(Debug, Clone, Copy)]
pub struct PulseStreakAdvance {
    pub streak: u32,
    pub last_streak_date: NaiveDate,
    /// Day count when the new streak is a positive multiple of 5
    pub milestone_days: Option<u32>,
}

/// Advance a pulse's shared streak for `today`.
///
/// `distinct_loggers_today` must count every user with a log in this pulse
/// today, including the submission being processed. Returns `None` when the
/// streak already advanced today or the quorum is not met.
pub fn advance_pulse_streak(
    streak: u32,
    last_streak_date: Option<NaiveDate>,
    distinct_loggers_today: usize,
    today: NaiveDate,
) -> Option<PulseStreakAdvance> {
    if last_streak_date == Some(today) {
        return None;
    }
    if distinct_loggers_today < PULSE_STREAK_QUORUM {
        return None;
    }

    let streak = streak + 1;
    Some(PulseStreakAdvance {
        streak,
        last_streak_date: today,
        milestone_days: (streak % 5 == 0).then_some(streak),
    })
}
