// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Streak and scoring behavior over simulated days.
//!
//! The clock is injected everywhere, so these tests walk a user through
//! calendar days without sleeping and assert the exact award sequence.

use chrono::NaiveDate;
use ironpulse::clock::{Clock, FixedClock};
use ironpulse::engine::events::{MilestoneClass, StreakMilestone};
use ironpulse::engine::levels::level_for_score;
use ironpulse::engine::{advance_personal_streak, advance_pulse_streak, PersonalStreakAdvance};
use ironpulse::models::AchievementLedger;

/// Walk a fresh user through `days` consecutive days of logging, returning
/// the advance outcomes in order.
fn simulate_days(days: u32) -> Vec<PersonalStreakAdvance> {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    let mut streak = 0;
    let mut last_date = None;
    let mut ledger = AchievementLedger::default();
    let mut outcomes = Vec::new();

    for _ in 0..days {
        let advance = advance_personal_streak(streak, last_date, &ledger, clock.today())
            .expect("new day must advance");
        streak = advance.streak;
        last_date = Some(advance.last_activity_date);
        ledger = advance.ledger.clone();
        outcomes.push(advance);
        clock.advance_days(1);
    }
    outcomes
}

#[test]
fn test_two_advances_on_one_day_increment_once() {
    let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let ledger = AchievementLedger::default();

    let first = advance_personal_streak(0, None, &ledger, today).expect("first advances");
    assert_eq!(first.streak, 1);

    let second = advance_personal_streak(
        first.streak,
        Some(first.last_activity_date),
        &first.ledger,
        today,
    );
    assert!(second.is_none(), "same-day advance must be a no-op");
}

#[test]
fn test_day_4_bonus_fires_exactly_once() {
    let outcomes = simulate_days(4);

    // Days 1–3: no bonus. Day 4: the one-time habit bonus.
    assert!(outcomes[..3].iter().all(|o| o.bonuses.is_empty()));
    assert_eq!(outcomes[3].bonuses.len(), 1);
    assert_eq!(outcomes[3].bonuses[0].points, 5);

    // Replaying day 4 against the same date is blocked outright.
    let last = &outcomes[3];
    assert!(advance_personal_streak(
        last.streak,
        Some(last.last_activity_date),
        &last.ledger,
        last.last_activity_date
    )
    .is_none());
}

#[test]
fn test_decade_bonus_recurring_one_time_gated() {
    let outcomes = simulate_days(20);

    // Day 10: one-time 10-day bonus plus the recurring decade bonus.
    let at_10: Vec<u32> = outcomes[9].bonuses.iter().map(|b| b.points).collect();
    assert_eq!(at_10, vec![5, 2]);

    // Day 20: only the recurring decade bonus; the one-time award stays
    // locked in the ledger.
    let at_20: Vec<u32> = outcomes[19].bonuses.iter().map(|b| b.points).collect();
    assert_eq!(at_20, vec![2]);
}

#[test]
fn test_milestone_classes_along_the_way() {
    let outcomes = simulate_days(20);

    // Day 15: five-day class. Day 20: only the ten-day class.
    assert_eq!(
        outcomes[14].milestone,
        Some(StreakMilestone::Personal {
            days: 15,
            class: MilestoneClass::FiveDay
        })
    );
    assert_eq!(
        outcomes[19].milestone,
        Some(StreakMilestone::Personal {
            days: 20,
            class: MilestoneClass::TenDay
        })
    );

    // Non-multiples are quiet.
    assert!(outcomes[16].milestone.is_none());
}

#[test]
fn test_thirty_and_sixty_day_bonuses() {
    let outcomes = simulate_days(60);

    let at_30: Vec<u32> = outcomes[29].bonuses.iter().map(|b| b.points).collect();
    assert_eq!(at_30, vec![5, 2]);

    let at_60: Vec<u32> = outcomes[59].bonuses.iter().map(|b| b.points).collect();
    assert_eq!(at_60, vec![10, 2]);

    // Days 40 and 50 get only the recurring bonus.
    for idx in [39, 49] {
        let points: Vec<u32> = outcomes[idx].bonuses.iter().map(|b| b.points).collect();
        assert_eq!(points, vec![2]);
    }
}

#[test]
fn test_pulse_streak_quorum_and_daily_guard() {
    let day1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

    // One logger alone never advances, no matter how often.
    assert!(advance_pulse_streak(0, None, 1, day1).is_none());
    assert!(advance_pulse_streak(0, None, 1, day1).is_none());

    // Two distinct loggers advance exactly once per day.
    let advanced = advance_pulse_streak(0, None, 2, day1).expect("quorum met");
    assert_eq!(advanced.streak, 1);
    assert!(advance_pulse_streak(advanced.streak, Some(day1), 4, day1).is_none());

    // Next day it can advance again.
    let next = advance_pulse_streak(advanced.streak, Some(day1), 3, day2).expect("new day");
    assert_eq!(next.streak, 2);
}

#[test]
fn test_pulse_milestone_every_five_days() {
    let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    let at_5 = advance_pulse_streak(4, None, 2, day).unwrap();
    assert_eq!(at_5.milestone_days, Some(5));

    let at_6 = advance_pulse_streak(5, None, 2, day).unwrap();
    assert_eq!(at_6.milestone_days, None);
}

#[test]
fn test_streak_bonuses_accumulate_into_levels() {
    // 11 points crosses the first tier boundary; check that a user who
    // earns day-4 (5), day-10 (5+2) bonuses lands in Iron Apprentice.
    let outcomes = simulate_days(10);
    let total: u32 = outcomes
        .iter()
        .flat_map(|o| o.bonuses.iter())
        .map(|b| b.points)
        .sum();

    assert_eq!(total, 12);
    assert_eq!(level_for_score(total).name, "Iron Apprentice");
}

#[test]
fn test_clock_injection_controls_today() {
    let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    clock.advance_days(1);

    // 2026 is not a leap year: the day after Feb 28 is Mar 1.
    assert_eq!(
        clock.today(),
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    );
}
