// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout CRUD routes (chain length 1).

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Workout;
use crate::ownership::{resolve_chain, ResourcePath};
use crate::routes::MessageResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/workouts", post(create_workout).get(list_workouts))
        .route(
            "/workouts/{id}",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkoutRequest {
    workout_name: String,
    duration: u32,
    #[serde(default)]
    description: String,
}

/// Only `workoutName` is mutable after creation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateWorkoutRequest {
    workout_name: String,
}

/// Create a workout owned by the verified caller.
///
/// `userId` comes from the token, never from the body.
async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>)> {
    let workout = Workout {
        id: None,
        user_id: user.uid,
        workout_name: payload.workout_name,
        duration: payload.duration,
        description: payload.description,
        created_at: now_rfc3339(),
    };

    let created = state.db.create_workout(&workout).await?;

    tracing::debug!(workout_id = ?created.id, "Workout created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// List all workouts owned by the caller. Order is unspecified.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Workout>>> {
    let workouts = state.db.list_workouts_for_user(&user.uid).await?;
    Ok(Json(workouts))
}

/// Get a single workout after resolving ownership.
async fn get_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Workout>> {
    let chain = resolve_chain(&state.db, &user.uid, &ResourcePath::workout(&id)).await?;
    Ok(Json(chain.workout))
}

/// Update a workout's name.
async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkoutRequest>,
) -> Result<Json<MessageResponse>> {
    let chain = resolve_chain(&state.db, &user.uid, &ResourcePath::workout(&id)).await?;

    let mut workout = chain.workout;
    workout.workout_name = payload.workout_name;
    state.db.set_workout(&id, &workout).await?;

    Ok(Json(MessageResponse::new("Workout updated")))
}

/// Delete a workout and all of its exercises and approaches.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    resolve_chain(&state.db, &user.uid, &ResourcePath::workout(&id)).await?;

    let deleted = state.db.delete_workout_cascade(&id).await?;
    tracing::info!(workout_id = %id, deleted, "Workout deleted");

    Ok(Json(MessageResponse::new("Workout deleted")))
}
