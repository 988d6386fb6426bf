// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Approach CRUD routes (chain length 3).
//!
//! Every operation resolves the workout → exercise parent chain first;
//! get/update/delete resolve all three levels.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Approach;
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
            "/workouts/{workout_id}/exercises/{exercise_id}/approaches",
            post(create_approach).get(list_approaches),
        )
        .route(
            "/workouts/{workout_id}/exercises/{exercise_id}/approaches/{approach_id}",
            get(get_approach)
                .put(update_approach)
                .delete(delete_approach),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateApproachRequest {
    number: u32,
    reps: u32,
    weight: f64,
    #[serde(default)]
    description: String,
}

/// Only `number`, `reps`, and `weight` are mutable after creation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateApproachRequest {
    number: u32,
    reps: u32,
    weight: f64,
}

/// Create an approach under an exercise the caller owns transitively.
///
/// `exerciseId` is taken from the resolved path, never from the body.
async fn create_approach(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
    Json(payload): Json<CreateApproachRequest>,
) -> Result<(StatusCode, Json<Approach>)> {
    resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::exercise(&workout_id, &exercise_id),
    )
    .await?;

    let approach = Approach {
        id: None,
        exercise_id,
        number: payload.number,
        reps: payload.reps,
        weight: payload.weight,
        description: payload.description,
    };

    let created = state.db.create_approach(&approach).await?;

    tracing::debug!(approach_id = ?created.id, "Approach created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// List an exercise's approaches. Order is unspecified.
async fn list_approaches(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id)): Path<(String, String)>,
) -> Result<Json<Vec<Approach>>> {
    resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::exercise(&workout_id, &exercise_id),
    )
    .await?;

    let approaches = state.db.list_approaches_for_exercise(&exercise_id).await?;
    Ok(Json(approaches))
}

/// Get a single approach after resolving the full chain.
async fn get_approach(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id, approach_id)): Path<(String, String, String)>,
) -> Result<Json<Approach>> {
    let chain = resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::approach(&workout_id, &exercise_id, &approach_id),
    )
    .await?;

    // The resolver guarantees the approach is present for this chain shape.
    let approach = chain
        .approach
        .ok_or_else(|| anyhow::anyhow!("resolved chain missing approach"))?;

    Ok(Json(approach))
}

/// Update an approach's whitelisted fields.
async fn update_approach(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id, approach_id)): Path<(String, String, String)>,
    Json(payload): Json<UpdateApproachRequest>,
) -> Result<Json<MessageResponse>> {
    let chain = resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::approach(&workout_id, &exercise_id, &approach_id),
    )
    .await?;

    let mut approach = chain
        .approach
        .ok_or_else(|| anyhow::anyhow!("resolved chain missing approach"))?;

    approach.number = payload.number;
    approach.reps = payload.reps;
    approach.weight = payload.weight;
    state.db.set_approach(&approach_id, &approach).await?;

    Ok(Json(MessageResponse::new("Approach updated")))
}

/// Delete an approach.
async fn delete_approach(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((workout_id, exercise_id, approach_id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>> {
    resolve_chain(
        &state.db,
        &user.uid,
        &ResourcePath::approach(&workout_id, &exercise_id, &approach_id),
    )
    .await?;

    state.db.delete_approach(&approach_id).await?;
    tracing::info!(approach_id = %approach_id, "Approach deleted");

    Ok(Json(MessageResponse::new("Approach deleted")))
}
