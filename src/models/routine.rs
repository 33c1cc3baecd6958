// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout routine model: baseline exercise targets grouped by weekday.

use serde::{Deserialize, Serialize};

/// Baseline target for one exercise within a routine day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTarget {
    /// Exercise ID, unique within the routine
    pub id: u64,
    pub name: String,
    /// Display order within the day
    #[serde(default)]
    pub position: u32,
    /// Target weight in kg. 0 for bodyweight movements.
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
}

/// One weekday of a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: u64,
    /// 0 = Sunday … 6 = Saturday
    pub weekday: u8,
    #[serde(default)]
    pub exercises: Vec<ExerciseTarget>,
}

/// A workout routine stored in Firestore.
///
/// Routines are read-only input to goal derivation and progress scoring;
/// the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    /// Numeric routine ID (also used as document ID)
    pub id: u64,
    /// User who created the routine
    pub owner_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number of users following this routine
    #[serde(default)]
    pub followers: u32,
    pub is_public: bool,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

impl Routine {
    /// Look up an exercise's baseline target anywhere in the routine.
    pub fn exercise(&self, exercise_id: u64) -> Option<&ExerciseTarget> {
        self.all_exercises().find(|ex| ex.id == exercise_id)
    }

    /// Every exercise across all days, in day order.
    pub fn all_exercises(&self) -> impl Iterator<Item = &ExerciseTarget> {
        self.days.iter().flat_map(|day| day.exercises.iter())
    }

    /// Exercises scheduled for a weekday (0 = Sunday).
    pub fn exercises_for_weekday(&self, weekday: u8) -> impl Iterator<Item = &ExerciseTarget> {
        self.days
            .iter()
            .filter(move |day| day.weekday == weekday)
            .flat_map(|day| day.exercises.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_routine() -> Routine {
        Routine {
            id: 1,
            owner_id: 100,
            name: "Push/Pull".to_string(),
            description: String::new(),
            followers: 0,
            is_public: true,
            days: vec![
                WorkoutDay {
                    id: 10,
                    weekday: 1,
                    exercises: vec![ExerciseTarget {
                        id: 7,
                        name: "Bench Press".to_string(),
                        position: 0,
                        weight: 80.0,
                        sets: 4,
                        reps: 8,
                    }],
                },
                WorkoutDay {
                    id: 11,
                    weekday: 4,
                    exercises: vec![ExerciseTarget {
                        id: 9,
                        name: "Deadlift".to_string(),
                        position: 0,
                        weight: 120.0,
                        sets: 3,
                        reps: 5,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_exercise_lookup_spans_days() {
        let routine = make_routine();

        assert_eq!(routine.exercise(9).map(|ex| ex.name.as_str()), Some("Deadlift"));
        assert!(routine.exercise(999).is_none());
    }

    #[test]
    fn test_exercises_for_weekday() {
        let routine = make_routine();

        let monday: Vec<_> = routine.exercises_for_weekday(1).collect();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].id, 7);

        assert_eq!(routine.exercises_for_weekday(2).count(), 0);
    }
}
