//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, SubmittedWorkout};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ROUTINES: &str = "routines";
    pub const PULSES: &str = "pulses";
    /// One document per pulse/user/day submission
    pub const WORKOUT_LOGS: &str = "workout_logs";
}
