// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration, login, and profile routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Public routes (no auth required).
pub fn routes_public() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Profile routes (auth required; the middleware is applied in routes/mod.rs).
pub fn routes_protected() -> Router<Arc<AppState>> {
    Router::new().route("/users/me", get(get_me))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct RegisterRequest {
    #[validate(email)]
    email: String,
    /// The provider enforces this too; checking here avoids a round trip.
    #[validate(length(min = 6))]
    password: String,
    #[validate(length(min = 1))]
    username: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub uid: String,
    pub token: String,
}

/// Register a new user: create the provider account, then store the profile.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let session = state
        .auth_client
        .sign_up(&payload.email, &payload.password)
        .await?;

    let user = User {
        username: payload.username,
        email: payload.email,
        created_at: now_rfc3339(),
    };
    state.db.create_user(&session.uid, &user).await?;

    tracing::info!(uid = %session.uid, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User registered".to_string(),
            uid: session.uid,
            token: session.id_token,
        }),
    ))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Sign in an existing user against the identity provider.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state
        .auth_client
        .sign_in(&payload.email, &payload.password)
        .await?;

    tracing::debug!(uid = %session.uid, "User logged in");

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        uid: session.uid,
        token: session.id_token,
    }))
}

// ─── Profile ─────────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub uid: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Get the profile for the verified caller.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(MeResponse {
        uid: user.uid,
        username: profile.username,
        email: profile.email,
        created_at: profile.created_at,
    }))
}
