use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ironpulse::engine::{apply_logged_sets, recompute_progress};
use ironpulse::models::{
    ExerciseGoal, ExerciseTarget, Participant, Routine, SetLog, WorkoutDay,
};
use std::collections::HashMap;

const EXERCISES_PER_ROUTINE: u64 = 40;

fn build_routine() -> Routine {
    // A large split: seven days, ~6 exercises per day.
    let days: Vec<WorkoutDay> = (0..7)
        .map(|weekday| WorkoutDay {
            id: weekday as u64,
            weekday,
            exercises: (0..EXERCISES_PER_ROUTINE / 7 + 1)
                .map(|i| {
                    let id = u64::from(weekday) * 10 + i;
                    ExerciseTarget {
                        id,
                        name: format!("Exercise {}", id),
                        position: i as u32,
                        weight: 40.0 + (id as f64) * 2.5,
                        sets: 4,
                        reps: 8,
                    }
                })
                .collect(),
        })
        .collect();

    Routine {
        id: 1,
        owner_id: 1,
        name: "Benchmark Split".to_string(),
        description: String::new(),
        followers: 0,
        is_public: true,
        days,
    }
}

fn build_participant(routine: &Routine) -> Participant {
    let goals: Vec<ExerciseGoal> = routine
        .all_exercises()
        .map(|ex| ExerciseGoal {
            exercise_id: ex.id,
            target_weight: ex.weight + 20.0,
            target_sets: ex.sets,
            target_reps: ex.reps,
        })
        .collect();

    let mut participant = Participant::new(1, Some(routine.id), goals);
    for ex in routine.all_exercises() {
        participant.record_stats(
            ex.id,
            ironpulse::models::LoggedStats {
                weight: ex.weight + 10.0,
                sets: ex.sets,
                reps: ex.reps,
            },
        );
    }
    participant
}

fn benchmark_progress(c: &mut Criterion) {
    let routine = build_routine();
    let participant = build_participant(&routine);

    let full_submission: Vec<SetLog> = routine
        .all_exercises()
        .map(|ex| SetLog {
            exercise_id: ex.id,
            weight: ex.weight + 12.5,
            sets: ex.sets,
            reps: ex.reps,
        })
        .collect();

    let mut group = c.benchmark_group("progress_engine");

    group.bench_function("apply_full_submission", |b| {
        b.iter(|| {
            apply_logged_sets(
                black_box(&participant),
                black_box(&full_submission),
                black_box(&routine),
            )
        })
    });

    group.bench_function("recompute_all_goals", |b| {
        b.iter(|| {
            recompute_progress(
                black_box(&participant.goals),
                black_box(&participant.last_logged_stats),
                black_box(&routine),
            )
        })
    });

    // Worst case for the baseline lookup: every goal misses.
    let orphan_goals: Vec<ExerciseGoal> = (1000..1000 + EXERCISES_PER_ROUTINE)
        .map(|id| ExerciseGoal {
            exercise_id: id,
            target_weight: 100.0,
            target_sets: 4,
            target_reps: 8,
        })
        .collect();
    let empty_logs: HashMap<String, ironpulse::models::LoggedStats> = HashMap::new();

    group.bench_function("recompute_with_missing_baselines", |b| {
        b.iter(|| {
            recompute_progress(
                black_box(&orphan_goals),
                black_box(&empty_logs),
                black_box(&routine),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_progress);
criterion_main!(benches);
