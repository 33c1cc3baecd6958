// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal derivation from a routine's baseline targets.

use crate::models::pulse::ExerciseGoal;
use crate::models::routine::Routine;

/// Smallest plate increment goals snap to.
const WEIGHT_STEP_KG: f64 = 2.5;

/// Percentage presets offered by the goal editor.
pub const SCALE_PRESETS: &[u32] = &[10, 25, 50];

/// Copy a routine's baseline targets as initial goals.
pub fn goals_from_routine(routine: &Routine) -> Vec<ExerciseGoal> {
    routine
        .all_exercises()
        .map(|ex| ExerciseGoal {
            exercise_id: ex.id,
            target_weight: ex.weight,
            target_sets: ex.sets,
            target_reps: ex.reps,
        })
        .collect()
}

/// Stretch every baseline weight by `percent`, snapped to the nearest
/// plate step. Sets and reps stay at baseline.
pub fn scale_goals(routine: &Routine, percent: u32) -> Vec<ExerciseGoal> {
    let multiplier = 1.0 + f64::from(percent) / 100.0;
    routine
        .all_exercises()
        .map(|ex| ExerciseGoal {
            exercise_id: ex.id,
            target_weight: round_to_step(ex.weight * multiplier),
            target_sets: ex.sets,
            target_reps: ex.reps,
        })
        .collect()
}

fn round_to_step(weight: f64) -> f64 {
    (weight / WEIGHT_STEP_KG).round() * WEIGHT_STEP_KG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::routine::{ExerciseTarget, WorkoutDay};

    fn routine() -> Routine {
        Routine {
            id: 1,
            owner_id: 100,
            name: "Test".to_string(),
            description: String::new(),
            followers: 0,
            is_public: true,
            days: vec![WorkoutDay {
                id: 10,
                weekday: 1,
                exercises: vec![ExerciseTarget {
                    id: 7,
                    name: "Bench Press".to_string(),
                    position: 0,
                    weight: 82.0,
                    sets: 4,
                    reps: 8,
                }],
            }],
        }
    }

    #[test]
    fn test_goals_from_routine_copies_baselines() {
        let goals = goals_from_routine(&routine());
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].target_weight, 82.0);
        assert_eq!(goals[0].target_reps, 8);
    }

    #[test]
    fn test_scaling_rounds_to_plate_step() {
        // 82 × 1.10 = 90.2 → 90.0
        let goals = scale_goals(&routine(), 10);
        assert_eq!(goals[0].target_weight, 90.0);

        // 82 × 1.25 = 102.5, already on the step
        let goals = scale_goals(&routine(), 25);
        assert_eq!(goals[0].target_weight, 102.5);
    }

    #[test]
    fn test_scaling_leaves_sets_and_reps_at_baseline() {
        let goals = scale_goals(&routine(), 50);
        assert_eq!(goals[0].target_sets, 4);
        assert_eq!(goals[0].target_reps, 8);
    }
}
