// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise CRUD routes (chain length 2).
//!
//! Every operation resolves at least the parent workout; get/update/delete
//! resolve the full workout → exercise chain.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Exercise;
use crate::ownership::{resolve_chain, ResourcePath};
use crate::routes::MessageResponse;
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
        .route(
            "/workouts/{workout_id}/exercises",
            post(create_exercise).get(list_exercises),
        )
        .route(
            "/workouts/{workout_id}/exercises/{exercise_id}",
            get(get_exercise)
                .put(update_exercise)
                .delete(delete_exercise),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateExerciseRequest {
    muscles: String,
    name: String,
    time: u32,
    #[serde(default)]
    description: String,
}

/// Only `muscles`, `name`, and `time` are mutable after creation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateExerciseRequest {
    muscles: String,
    name: String,
    time: u32,
}

/// Create an exercise under a workout the caller owns.
///
/// `workoutId` is taken from the resolved path, never from the body.
async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<String>,
    Json(payload): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>)> {
    resolve_chain(&state.db, &user.uid, &ResourcePath::workout(&workout_id)).await?;

    let exercise = Exercise {
        id: None,
        workout_id,
        muscles: payload.muscles,
        name: payload.name,
        time: payload.time,
        description: payload.description,
    };

    let created = state.db.create_exercise(&exercise).await?;

    tracing::debug!(exercise_id = ?created.id, "Exercise created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// List a workout's exercises. Order is unspecified.
async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(workout_id): Path<String>,
) -> Result<Json<Vec<Exercise>>> {
    resolve_chain(&state.db, &user.uid, &ResourcePath::workout(&workout_id)).await?;

    let exercises = state.db.list_exercises_for_workout(&workout_id).await?;
    Ok(Json(exercises))
}

/// Get a single exercise after resolving the full chain.
async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
) -> Result<Json<Exercise>> {
    let chain = resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::exercise(&workout_id, &exercise_id),
    )
    .await?;

    // The resolver guarantees the exercise is present for this chain shape.
    let exercise = chain
        .exercise
        .ok_or_else(|| anyhow::anyhow!("resolved chain missing exercise"))?;

    Ok(Json(exercise))
}

/// Update an exercise's whitelisted fields.
async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
    Json(payload): Json<UpdateExerciseRequest>,
) -> Result<Json<MessageResponse>> {
    let chain = resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::exercise(&workout_id, &exercise_id),
    )
    .await?;

    let mut exercise = chain
        .exercise
        .ok_or_else(|| anyhow::anyhow!("resolved chain missing exercise"))?;

    exercise.muscles = payload.muscles;
    exercise.name = payload.name;
    exercise.time = payload.time;
    state.db.set_exercise(&exercise_id, &exercise).await?;

    Ok(Json(MessageResponse::new("Exercise updated")))
}

/// Delete an exercise and all of its approaches.
async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>> {
    resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::exercise(&workout_id, &exercise_id),
    )
    .await?;

    let deleted = state.db.delete_exercise_cascade(&exercise_id).await?;
    tracing::info!(exercise_id = %exercise_id, deleted, "Exercise deleted");

    Ok(Json(MessageResponse::new("Exercise deleted")))
}
