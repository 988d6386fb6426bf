//! Approach (set record) model - the deepest level of the ownership chain.

use serde::{Deserialize, Serialize};

/// A single set within an exercise: ordinal, repetitions, and weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approach {
    /// Firestore document id (populated on reads, absent in stored fields)
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Parent exercise's document id
    pub exercise_id: String,
    /// Set ordinal within the exercise
    pub number: u32,
    pub reps: u32,
    pub weight: f64,
    pub description: String,
}
