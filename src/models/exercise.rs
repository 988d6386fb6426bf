//! Exercise model - second level of the ownership chain.

use serde::{Deserialize, Serialize};

/// An exercise performed within a workout.
///
/// Only valid in the context of its parent workout's owner; `workout_id` is
/// set from the resolved parent, never from the client body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Firestore document id (populated on reads, absent in stored fields)
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Parent workout's document id
    pub workout_id: String,
    /// Muscle groups targeted
    pub muscles: String,
    pub name: String,
    /// Time spent on this exercise, in minutes
    pub time: u32,
    pub description: String,
}
