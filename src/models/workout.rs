//! Workout model - the top level of the ownership chain.

use serde::{Deserialize, Serialize};

/// A workout session owned by a single user.
///
/// `user_id` is set from the verified caller at creation and never
/// reassigned; every nested resource derives its effective owner from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Firestore document id (populated on reads, absent in stored fields)
    #[serde(alias = "_firestore_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user's uid
    pub user_id: String,
    pub workout_name: String,
    /// Duration in minutes
    pub duration: u32,
    pub description: String,
    pub created_at: String,
}
