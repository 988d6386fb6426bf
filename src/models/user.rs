//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore, keyed by the identity provider uid.
///
/// The uid itself lives in the document name; it is not duplicated in the
/// stored fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name chosen at registration
    pub username: String,
    /// Email address used for sign-in
    pub email: String,
    /// When the account was registered (RFC 3339)
    pub created_at: String,
}
