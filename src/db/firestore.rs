// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, keyed by provider uid)
//! - Workouts (top-level, owned via `userId`)
//! - Exercises (children of workouts via `workoutId`)
//! - Approaches (children of exercises via `exerciseId`)
//!
//! Child deletions cascade: removing a workout removes its exercises and
//! their approaches, removing an exercise removes its approaches.

use crate::db::{collections, fields};
use crate::error::AppError;
use crate::models::{Approach, Exercise, User, Workout};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by provider uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a user profile under the provider uid.
    pub async fn create_user(&self, uid: &str, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Create a workout with a store-assigned document id.
    ///
    /// Returns the stored document with `id` populated.
    pub async fn create_workout(&self, workout: &Workout) -> Result<Workout, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::WORKOUTS)
            .generate_document_id()
            .object(workout)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a workout by document id.
    pub async fn get_workout(&self, id: &str) -> Result<Option<Workout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all workouts owned by a user. Order is unspecified.
    pub async fn list_workouts_for_user(&self, uid: &str) -> Result<Vec<Workout>, AppError> {
        let uid = uid.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| q.field(fields::USER_ID).eq(uid.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite a workout document.
    pub async fn set_workout(&self, id: &str, workout: &Workout) -> Result<(), AppError> {
        // The id lives in the document name, not the stored fields.
        let mut workout = workout.clone();
        workout.id = None;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WORKOUTS)
            .document_id(id)
            .object(&workout)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a workout and cascade to its exercises and their approaches.
    ///
    /// Returns the number of documents deleted (including the workout).
    pub async fn delete_workout_cascade(&self, id: &str) -> Result<usize, AppError> {
        let exercises = self.list_exercises_for_workout(id).await?;
        let exercise_ids: Vec<String> = exercises.iter().filter_map(|e| e.id.clone()).collect();

        // Collect approach ids across all child exercises with bounded concurrency.
        let approach_ids: Vec<String> = stream::iter(exercise_ids.clone())
            .map(|exercise_id| async move {
                let approaches = self.list_approaches_for_exercise(&exercise_id).await?;
                Ok::<_, AppError>(
                    approaches
                        .into_iter()
                        .filter_map(|a| a.id)
                        .collect::<Vec<String>>(),
                )
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Vec<String>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Vec<String>>, AppError>>()?
            .into_iter()
            .flatten()
            .collect();

        self.batch_delete(collections::APPROACHES, &approach_ids)
            .await?;
        self.batch_delete(collections::EXERCISES, &exercise_ids)
            .await?;

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORKOUTS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = approach_ids.len() + exercise_ids.len() + 1;
        tracing::debug!(workout_id = id, deleted, "Workout deleted with children");
        Ok(deleted)
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Create an exercise with a store-assigned document id.
    pub async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::EXERCISES)
            .generate_document_id()
            .object(exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an exercise by document id.
    pub async fn get_exercise(&self, id: &str) -> Result<Option<Exercise>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all exercises belonging to a workout. Order is unspecified.
    pub async fn list_exercises_for_workout(
        &self,
        workout_id: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let workout_id = workout_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(move |q| q.field(fields::WORKOUT_ID).eq(workout_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite an exercise document.
    pub async fn set_exercise(&self, id: &str, exercise: &Exercise) -> Result<(), AppError> {
        let mut exercise = exercise.clone();
        exercise.id = None;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EXERCISES)
            .document_id(id)
            .object(&exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an exercise and cascade to its approaches.
    ///
    /// Returns the number of documents deleted (including the exercise).
    pub async fn delete_exercise_cascade(&self, id: &str) -> Result<usize, AppError> {
        let approaches = self.list_approaches_for_exercise(id).await?;
        let approach_ids: Vec<String> = approaches.into_iter().filter_map(|a| a.id).collect();

        self.batch_delete(collections::APPROACHES, &approach_ids)
            .await?;

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EXERCISES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted = approach_ids.len() + 1;
        tracing::debug!(exercise_id = id, deleted, "Exercise deleted with children");
        Ok(deleted)
    }

    // ─── Approach Operations ─────────────────────────────────────

    /// Create an approach with a store-assigned document id.
    pub async fn create_approach(&self, approach: &Approach) -> Result<Approach, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::APPROACHES)
            .generate_document_id()
            .object(approach)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an approach by document id.
    pub async fn get_approach(&self, id: &str) -> Result<Option<Approach>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::APPROACHES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all approaches belonging to an exercise. Order is unspecified.
    pub async fn list_approaches_for_exercise(
        &self,
        exercise_id: &str,
    ) -> Result<Vec<Approach>, AppError> {
        let exercise_id = exercise_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::APPROACHES)
            .filter(move |q| q.field(fields::EXERCISE_ID).eq(exercise_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite an approach document.
    pub async fn set_approach(&self, id: &str, approach: &Approach) -> Result<(), AppError> {
        let mut approach = approach.clone();
        approach.id = None;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::APPROACHES)
            .document_id(id)
            .object(&approach)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an approach document.
    pub async fn delete_approach(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::APPROACHES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Batch delete documents by id using transactions.
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let client = self.get_client()?;

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}
