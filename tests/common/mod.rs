// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gymvoid_api::config::Config;
use gymvoid_api::db::FirestoreDb;
use gymvoid_api::routes::create_router;
use gymvoid_api::services::{FirebaseAuthClient, FirebaseTokenVerifier};
use gymvoid_api::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;

/// Signing secret shared by the static test verifier and `mint_id_token`.
pub const TEST_SIGNING_SECRET: &[u8] = b"test_signing_key_32_bytes_long!!";
pub const TEST_KID: &str = "test-kid";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Mint an ID token the static test verifier accepts.
#[allow(dead_code)]
pub fn mint_id_token(uid: &str) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        aud: String,
        iss: String,
        exp: usize,
        iat: usize,
    }

    let now = chrono::Utc::now().timestamp() as usize;
    let config = Config::test_default();

    let claims = Claims {
        sub: uid.to_string(),
        aud: config.firebase_project_id.clone(),
        iss: format!(
            "https://securetoken.google.com/{}",
            config.firebase_project_id
        ),
        exp: now + 3600,
        iat: now,
    };

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(TEST_SIGNING_SECRET),
    )
    .expect("Failed to mint test token")
}

/// Create a test app with offline mock dependencies and a static-key
/// verifier. Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let token_verifier = Arc::new(
        FirebaseTokenVerifier::new_with_static_key(
            &config.firebase_project_id,
            TEST_KID,
            Algorithm::HS256,
            DecodingKey::from_secret(TEST_SIGNING_SECRET),
        )
        .expect("Failed to build static verifier"),
    );
    let auth_client = FirebaseAuthClient::new(config.firebase_api_key.clone());

    let state = Arc::new(AppState {
        config,
        db,
        token_verifier,
        auth_client,
    });

    (create_router(state.clone()), state)
}
