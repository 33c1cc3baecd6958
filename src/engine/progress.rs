// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normalized competitive progress.
//!
//! A participant's progress interpolates logged training volume between
//! the routine's baseline ("where you started") and the participant's own
//! goal ("where you're aiming"), so partial improvement earns proportional
//! credit. Goals at or below baseline degrade to a pass/fail check on
//! weight.

use std::collections::HashMap;

use crate::models::pulse::{ExerciseGoal, LoggedStats, Participant, SetLog};
use crate::models::routine::{ExerciseTarget, Routine};

/// Contribution of a single exercise toward overall progress, in `[0, 1]`.
///
/// A missing baseline (goal referencing a deleted or renamed exercise)
/// contributes 0 rather than failing the whole computation.
pub fn exercise_contribution(
    goal: &ExerciseGoal,
    baseline: Option<&ExerciseTarget>,
    observed: Option<&LoggedStats>,
) -> f64 {
    let Some(observed) = observed else {
        return 0.0;
    };
    let Some(baseline) = baseline else {
        return 0.0;
    };

    // Bodyweight movements carry no baseline load to scale against:
    // pass/fail on weight alone.
    if baseline.weight <= 0.0 {
        return if observed.weight >= goal.target_weight {
            1.0
        } else {
            0.0
        };
    }

    if goal.target_weight > baseline.weight {
        // Stretch goal: interpolate on volume (weight × reps).
        let base_volume = baseline.weight * f64::from(baseline.reps);
        let goal_volume = goal.target_weight * f64::from(goal.target_reps);
        let logged_volume = observed.weight * f64::from(observed.reps);
        let span = goal_volume - base_volume;
        if span > 0.0 {
            ((logged_volume - base_volume) / span).clamp(0.0, 1.0)
        } else if logged_volume >= goal_volume {
            // Heavier goal weight but fewer target reps can leave no volume
            // gradient to interpolate along.
            1.0
        } else {
            0.0
        }
    } else if observed.weight >= goal.target_weight {
        1.0
    } else {
        0.0
    }
}

/// Recompute overall progress over every goal.
///
/// Empty goals mean zero demonstrated progress, not an undefined value.
pub fn recompute_progress(
    goals: &[ExerciseGoal],
    last_logged: &HashMap<String, LoggedStats>,
    routine: &Routine,
) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }

    let total: f64 = goals
        .iter()
        .map(|goal| {
            exercise_contribution(
                goal,
                routine.exercise(goal.exercise_id),
                last_logged.get(&goal.exercise_id.to_string()),
            )
        })
        .sum();

    100.0 * total / goals.len() as f64
}

/// What a submission contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSummary {
    /// Exercises in the submission that matched a goal
    pub matched_exercises: usize,
    /// Sum of their contributions, each in `[0, 1]`
    pub total_contribution: f64,
    /// Participant progress after the submission
    pub progress: f64,
}

/// Fold a submission into the participant.
///
/// Every set overwrites that exercise's cached stats (last write wins,
/// even when no goal exists for it yet). Progress averages contributions
/// only over the exercises matched in this submission; a submission that
/// matches no goals leaves the cached progress untouched so an empty or
/// irrelevant submission cannot zero a participant out.
pub fn apply_logged_sets(
    participant: &Participant,
    sets: &[SetLog],
    routine: &Routine,
) -> (Participant, LogSummary) {
    let mut updated = participant.clone();
    let mut total_contribution = 0.0;
    let mut matched_exercises = 0usize;

    for set in sets {
        let observed = LoggedStats {
            weight: set.weight,
            sets: set.sets,
            reps: set.reps,
        };
        if let Some(goal) = participant.goal(set.exercise_id) {
            total_contribution += exercise_contribution(
                goal,
                routine.exercise(set.exercise_id),
                Some(&observed),
            );
            matched_exercises += 1;
        }
        updated.record_stats(set.exercise_id, observed);
    }

    let progress = if matched_exercises > 0 {
        100.0 * total_contribution / matched_exercises as f64
    } else {
        participant.progress
    };
    updated.progress = progress;

    (
        updated,
        LogSummary {
            matched_exercises,
            total_contribution,
            progress,
        },
    )
}

/// Apply a goal edit or routine switch.
///
/// Switching routines makes the cached logs incomparable to the new goals,
/// so progress and the cache reset. Editing goals on the same routine
/// re-scores the existing cache against the new targets without
/// re-logging.
pub fn apply_goal_change(
    participant: &Participant,
    new_goals: Vec<ExerciseGoal>,
    new_routine_id: u64,
    routine: &Routine,
) -> Participant {
    let mut updated = participant.clone();
    updated.goals = new_goals;

    if participant.selected_routine_id != Some(new_routine_id) {
        updated.selected_routine_id = Some(new_routine_id);
        updated.progress = 0.0;
        updated.last_logged_stats.clear();
    } else {
        updated.progress =
            recompute_progress(&updated.goals, &updated.last_logged_stats, routine);
    }

    updated
}
