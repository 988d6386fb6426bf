//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const WORKOUTS: &str = "workouts";
    pub const EXERCISES: &str = "exercises";
    pub const APPROACHES: &str = "approaches";
}

/// Parent-reference field names as stored in Firestore documents.
pub mod fields {
    pub const USER_ID: &str = "userId";
    pub const WORKOUT_ID: &str = "workoutId";
    pub const EXERCISE_ID: &str = "exerciseId";
}
