// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Score awards and their one-time gating.

use crate::engine::events::{LevelUp, ScoreEvent};
use crate::engine::levels;
use crate::models::user::AchievementLedger;

/// Actions that earn score outside of streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreAward {
    RoutineCreated,
    PulseCreated,
    PulseJoined,
    RoutineFollowed,
}

impl ScoreAward {
    pub fn points(self) -> u32 {
        match self {
            ScoreAward::RoutineCreated | ScoreAward::RoutineFollowed => 2,
            ScoreAward::PulseCreated | ScoreAward::PulseJoined => 7,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreAward::RoutineCreated => "New routine created! Consistency is the key.",
            ScoreAward::PulseCreated | ScoreAward::PulseJoined => {
                "Challenge accepted! Show what you're made of."
            }
            ScoreAward::RoutineFollowed => {
                "Someone follows your routine! You're inspiring others."
            }
        }
    }
}

/// Outcome of applying a flat award to a score.
#[derive(Debug, Clone)]
pub struct AwardOutcome {
    pub new_score: u32,
    pub event: ScoreEvent,
    pub level_up: Option<LevelUp>,
}

/// Apply a flat award.
pub fn apply_award(score: u32, award: ScoreAward) -> AwardOutcome {
    let new_score = score + award.points();
    AwardOutcome {
        new_score,
        event: ScoreEvent {
            points: award.points(),
            message: award.message().to_string(),
            new_total: new_score,
        },
        level_up: levels::level_up(score, new_score),
    }
}

/// Take back a follower award (on unfollow), saturating at zero.
pub fn revoke_follower_award(score: u32) -> u32 {
    score.saturating_sub(ScoreAward::RoutineFollowed.points())
}

/// A streak-day bonus before it is folded into a running score total.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakBonus {
    pub points: u32,
    pub message: String,
}

/// One-time streak achievements: (day, ledger key, points, message).
const STREAK_ACHIEVEMENTS: &[(u32, &str, u32, &str)] = &[
    (4, "streak_4_days", 5, "4-day streak! You're building a habit."),
    (10, "streak_10_days", 5, "10-day streak! Momentum is on your side."),
    (30, "streak_30_days", 5, "30-day streak! You're unstoppable."),
    (60, "streak_60_days", 10, "60 days straight. Iron discipline."),
];

/// Recurring bonus on every positive multiple of 10. Never ledger-gated.
const DECADE_BONUS_POINTS: u32 = 2;

/// Bonuses earned by reaching `streak` days.
///
/// One-time awards are gated through the ledger so they cannot re-trigger
/// (e.g. after an admin streak reset); the decade bonus repeats on every
/// multiple of 10. Returns the updated ledger alongside the bonuses.
pub fn streak_bonuses(
    streak: u32,
    ledger: &AchievementLedger,
) -> (AchievementLedger, Vec<StreakBonus>) {
    let mut ledger = ledger.clone();
    let mut bonuses = Vec::new();

    for &(day, key, points, message) in STREAK_ACHIEVEMENTS {
        if streak == day && ledger.unlock(key) {
            bonuses.push(StreakBonus {
                points,
                message: message.to_string(),
            });
        }
    }

    if streak > 0 && streak % 10 == 0 {
        bonuses.push(StreakBonus {
            points: DECADE_BONUS_POINTS,
            message: format!("{streak} days of showing up. Bonus earned."),
        });
    }

    (ledger, bonuses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_award_points() {
        let outcome = apply_award(0, ScoreAward::PulseCreated);
        assert_eq!(outcome.new_score, 7);
        assert_eq!(outcome.event.points, 7);
        assert_eq!(outcome.event.new_total, 7);
        assert!(outcome.level_up.is_none());
    }

    #[test]
    fn test_award_can_trigger_level_up() {
        let outcome = apply_award(10, ScoreAward::RoutineCreated);
        let up = outcome.level_up.expect("crossing 11");
        assert_eq!(up.new_level.name, "Iron Apprentice");
    }

    #[test]
    fn test_revoke_follower_award_saturates() {
        assert_eq!(revoke_follower_award(5), 3);
        assert_eq!(revoke_follower_award(1), 0);
        assert_eq!(revoke_follower_award(0), 0);
    }

    #[test]
    fn test_day_4_bonus_fires_once() {
        let ledger = AchievementLedger::default();

        let (ledger, bonuses) = streak_bonuses(4, &ledger);
        assert_eq!(bonuses.len(), 1);
        assert_eq!(bonuses[0].points, 5);

        // Gated: reaching day 4 again (after a reset) awards nothing.
        let (_, again) = streak_bonuses(4, &ledger);
        assert!(again.is_empty());
    }

    #[test]
    fn test_day_10_stacks_one_time_and_decade_bonus() {
        let ledger = AchievementLedger::default();

        let (ledger, bonuses) = streak_bonuses(10, &ledger);
        let points: Vec<u32> = bonuses.iter().map(|b| b.points).collect();
        assert_eq!(points, vec![5, 2]);

        // Day 20: only the recurring decade bonus.
        let (_, at_20) = streak_bonuses(20, &ledger);
        assert_eq!(at_20.len(), 1);
        assert_eq!(at_20[0].points, DECADE_BONUS_POINTS);
    }

    #[test]
    fn test_decade_bonus_repeats_without_gating() {
        let ledger = AchievementLedger::default();

        let (ledger, at_20) = streak_bonuses(20, &ledger);
        assert_eq!(at_20.len(), 1);

        let (_, at_20_again) = streak_bonuses(20, &ledger);
        assert_eq!(at_20_again.len(), 1, "decade bonus is intentionally repeatable");
    }

    #[test]
    fn test_non_milestone_days_award_nothing() {
        let ledger = AchievementLedger::default();
        for day in [1, 2, 3, 5, 7, 11, 15, 29] {
            let (_, bonuses) = streak_bonuses(day, &ledger);
            assert!(bonuses.is_empty(), "day {day} should award nothing");
        }
    }
}
