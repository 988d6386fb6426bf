// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ownership chain resolution for nested resources.
//!
//! Every nested CRUD operation must confirm, before touching the store for
//! its real work, that the requested resource chain is intact: the workout
//! belongs to the caller, the exercise belongs to that workout, the approach
//! belongs to that exercise. This module is the single place that walks the
//! chain; handlers compose it instead of repeating per-endpoint checks.
//!
//! The walk is strictly sequential and short-circuits on the first failure.
//! Absent documents report as `NotFound` (404); ownership and misattributed
//! parents report as `Forbidden`/`ParentMismatch` (403). The two signals stay
//! distinct at every level.

use crate::error::AppError;
use crate::models::{Approach, Exercise, Workout};
use async_trait::async_trait;

/// Fetch capability the resolver walks over.
///
/// `FirestoreDb` implements this for production; tests use an in-memory
/// store. The resolver performs no writes through this trait.
#[async_trait]
pub trait ChainStore: Send + Sync {
    async fn workout_by_id(&self, id: &str) -> Result<Option<Workout>, AppError>;
    async fn exercise_by_id(&self, id: &str) -> Result<Option<Exercise>, AppError>;
    async fn approach_by_id(&self, id: &str) -> Result<Option<Approach>, AppError>;
}

#[async_trait]
impl ChainStore for crate::db::FirestoreDb {
    async fn workout_by_id(&self, id: &str) -> Result<Option<Workout>, AppError> {
        self.get_workout(id).await
    }

    async fn exercise_by_id(&self, id: &str) -> Result<Option<Exercise>, AppError> {
        self.get_exercise(id).await
    }

    async fn approach_by_id(&self, id: &str) -> Result<Option<Approach>, AppError> {
        self.get_approach(id).await
    }
}

/// The requested chain of resource ids, top-down.
///
/// Constructors enforce that deeper levels always name their parents.
#[derive(Debug, Clone)]
pub struct ResourcePath {
    workout_id: String,
    exercise_id: Option<String>,
    approach_id: Option<String>,
}

impl ResourcePath {
    /// A chain of length 1: just a workout.
    pub fn workout(workout_id: impl Into<String>) -> Self {
        Self {
            workout_id: workout_id.into(),
            exercise_id: None,
            approach_id: None,
        }
    }

    /// A chain of length 2: a workout and one of its exercises.
    pub fn exercise(workout_id: impl Into<String>, exercise_id: impl Into<String>) -> Self {
        Self {
            workout_id: workout_id.into(),
            exercise_id: Some(exercise_id.into()),
            approach_id: None,
        }
    }

    /// A chain of length 3: workout, exercise, approach.
    pub fn approach(
        workout_id: impl Into<String>,
        exercise_id: impl Into<String>,
        approach_id: impl Into<String>,
    ) -> Self {
        Self {
            workout_id: workout_id.into(),
            exercise_id: Some(exercise_id.into()),
            approach_id: Some(approach_id.into()),
        }
    }
}

/// The fully resolved chain of documents.
///
/// Callers use the deepest document for the actual operation; parents are
/// available for building nested responses.
#[derive(Debug, Clone)]
pub struct ResolvedChain {
    pub workout: Workout,
    pub exercise: Option<Exercise>,
    pub approach: Option<Approach>,
}

/// Walk the chain top-down, verifying existence and ownership at each level.
///
/// 1. The workout must exist and be owned by `caller_uid`.
/// 2. The exercise (if requested) must exist and reference that workout.
/// 3. The approach (if requested) must exist and reference that exercise.
pub async fn resolve_chain<S: ChainStore + ?Sized>(
    store: &S,
    caller_uid: &str,
    path: &ResourcePath,
) -> Result<ResolvedChain, AppError> {
    let workout = store
        .workout_by_id(&path.workout_id)
        .await?
        .ok_or(AppError::NotFound("Workout"))?;

    if workout.user_id != caller_uid {
        tracing::warn!(
            uid = caller_uid,
            workout_id = %path.workout_id,
            "Ownership check failed for workout"
        );
        return Err(AppError::Forbidden);
    }

    let exercise = match &path.exercise_id {
        None => None,
        Some(exercise_id) => {
            let exercise = store
                .exercise_by_id(exercise_id)
                .await?
                .ok_or(AppError::NotFound("Exercise"))?;

            if exercise.workout_id != path.workout_id {
                tracing::warn!(
                    uid = caller_uid,
                    workout_id = %path.workout_id,
                    exercise_id = %exercise_id,
                    "Exercise is attached to a different workout"
                );
                return Err(AppError::ParentMismatch {
                    child: "Exercise",
                    parent: "workout",
                });
            }

            Some(exercise)
        }
    };

    let approach = match (&path.approach_id, &path.exercise_id) {
        (None, _) => None,
        // Unreachable through the constructors; kept as a guard.
        (Some(_), None) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "approach requested without an exercise in the chain"
            )))
        }
        (Some(approach_id), Some(exercise_id)) => {
            let approach = store
                .approach_by_id(approach_id)
                .await?
                .ok_or(AppError::NotFound("Approach"))?;

            if approach.exercise_id != *exercise_id {
                tracing::warn!(
                    uid = caller_uid,
                    exercise_id = %exercise_id,
                    approach_id = %approach_id,
                    "Approach is attached to a different exercise"
                );
                return Err(AppError::ParentMismatch {
                    child: "Approach",
                    parent: "exercise",
                });
            }

            Some(approach)
        }
    };

    Ok(ResolvedChain {
        workout,
        exercise,
        approach,
    })
}
