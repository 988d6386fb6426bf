// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST).
//!
//! They exercise the store wrapper and the ownership chain resolver against
//! real queries: document creation with store-assigned ids, parent-field
//! queries, the full failure taxonomy, and cascading deletes.

use gymvoid_api::error::AppError;
use gymvoid_api::models::{Approach, Exercise, User, Workout};
use gymvoid_api::ownership::{resolve_chain, ResourcePath};

mod common;
use common::test_db;

/// Generate a unique uid for test isolation.
fn unique_uid(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

fn test_workout(uid: &str) -> Workout {
    Workout {
        id: None,
        user_id: uid.to_string(),
        workout_name: "Push day".to_string(),
        duration: 60,
        description: "chest, shoulders, triceps".to_string(),
        created_at: "2026-01-15T10:00:00Z".to_string(),
    }
}

fn test_exercise(workout_id: &str) -> Exercise {
    Exercise {
        id: None,
        workout_id: workout_id.to_string(),
        muscles: "chest".to_string(),
        name: "Bench press".to_string(),
        time: 15,
        description: String::new(),
    }
}

fn test_approach(exercise_id: &str) -> Approach {
    Approach {
        id: None,
        exercise_id: exercise_id.to_string(),
        number: 1,
        reps: 8,
        weight: 80.0,
        description: String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_profile_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");

    let before = db.get_user(&uid).await.unwrap();
    assert!(before.is_none(), "User should not exist before creation");

    let user = User {
        username: "tester".to_string(),
        email: "tester@example.com".to_string(),
        created_at: "2026-01-15T10:00:00Z".to_string(),
    };
    db.create_user(&uid, &user).await.unwrap();

    let fetched = db.get_user(&uid).await.unwrap().expect("User should exist");
    assert_eq!(fetched.username, "tester");
    assert_eq!(fetched.email, "tester@example.com");
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKOUT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_workout_create_assigns_id() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");

    let created = db.create_workout(&test_workout(&uid)).await.unwrap();
    let id = created.id.expect("Store should assign an id");

    let fetched = db.get_workout(&id).await.unwrap().expect("Workout exists");
    assert_eq!(fetched.id.as_deref(), Some(id.as_str()));
    assert_eq!(fetched.user_id, uid);
    assert_eq!(fetched.workout_name, "Push day");
    assert_eq!(fetched.duration, 60);
}

#[tokio::test]
async fn test_workout_listing_is_scoped_to_user() {
    require_emulator!();

    let db = test_db().await;
    let uid_a = unique_uid("alice");
    let uid_b = unique_uid("bob");

    db.create_workout(&test_workout(&uid_a)).await.unwrap();
    db.create_workout(&test_workout(&uid_a)).await.unwrap();
    db.create_workout(&test_workout(&uid_b)).await.unwrap();

    let for_a = db.list_workouts_for_user(&uid_a).await.unwrap();
    assert_eq!(for_a.len(), 2);
    assert!(for_a.iter().all(|w| w.user_id == uid_a));

    let for_b = db.list_workouts_for_user(&uid_b).await.unwrap();
    assert_eq!(for_b.len(), 1);
}

#[tokio::test]
async fn test_workout_update_overwrites_name_only() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");

    let created = db.create_workout(&test_workout(&uid)).await.unwrap();
    let id = created.id.clone().unwrap();

    // Fetch-modify-write the way the update handler does.
    let mut workout = created;
    workout.workout_name = "Leg day".to_string();
    db.set_workout(&id, &workout).await.unwrap();

    let fetched = db.get_workout(&id).await.unwrap().unwrap();
    assert_eq!(fetched.workout_name, "Leg day");
    assert_eq!(fetched.user_id, uid, "Owner must survive updates");
    assert_eq!(fetched.duration, 60);
}

// ═══════════════════════════════════════════════════════════════════════════
// OWNERSHIP RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_resolver_full_chain_against_store() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let workout = db.create_workout(&test_workout(&uid)).await.unwrap();
    let workout_id = workout.id.unwrap();
    let exercise = db.create_exercise(&test_exercise(&workout_id)).await.unwrap();
    let exercise_id = exercise.id.unwrap();
    let approach = db.create_approach(&test_approach(&exercise_id)).await.unwrap();
    let approach_id = approach.id.unwrap();

    let chain = resolve_chain(
        &db,
        &uid,
        &ResourcePath::approach(&workout_id, &exercise_id, &approach_id),
    )
    .await
    .unwrap();

    assert_eq!(chain.workout.user_id, uid);
    assert_eq!(chain.exercise.unwrap().workout_id, workout_id);
    assert_eq!(chain.approach.unwrap().exercise_id, exercise_id);
}

#[tokio::test]
async fn test_resolver_rejects_foreign_caller() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_uid("alice");
    let stranger = unique_uid("mallory");

    let workout = db.create_workout(&test_workout(&owner)).await.unwrap();
    let workout_id = workout.id.unwrap();

    let err = resolve_chain(&db, &stranger, &ResourcePath::workout(&workout_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn test_resolver_rejects_misattributed_exercise() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let w1 = db.create_workout(&test_workout(&uid)).await.unwrap();
    let w2 = db.create_workout(&test_workout(&uid)).await.unwrap();
    let exercise = db
        .create_exercise(&test_exercise(w1.id.as_ref().unwrap()))
        .await
        .unwrap();

    // Same owner, wrong parent: 403, not 404.
    let err = resolve_chain(
        &db,
        &uid,
        &ResourcePath::exercise(w2.id.as_ref().unwrap(), exercise.id.as_ref().unwrap()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ParentMismatch { .. }));
}

#[tokio::test]
async fn test_resolver_missing_workout_is_not_found() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let err = resolve_chain(&db, &uid, &ResourcePath::workout("does-not-exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Workout")));
}

// ═══════════════════════════════════════════════════════════════════════════
// CASCADING DELETES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_workout_delete_cascades_to_children() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let workout = db.create_workout(&test_workout(&uid)).await.unwrap();
    let workout_id = workout.id.unwrap();

    let e1 = db.create_exercise(&test_exercise(&workout_id)).await.unwrap();
    let e2 = db.create_exercise(&test_exercise(&workout_id)).await.unwrap();
    let e1_id = e1.id.unwrap();
    let e2_id = e2.id.unwrap();

    let a1 = db.create_approach(&test_approach(&e1_id)).await.unwrap();
    let a2 = db.create_approach(&test_approach(&e2_id)).await.unwrap();

    // 1 workout + 2 exercises + 2 approaches
    let deleted = db.delete_workout_cascade(&workout_id).await.unwrap();
    assert_eq!(deleted, 5);

    assert!(db.get_workout(&workout_id).await.unwrap().is_none());
    assert!(db.get_exercise(&e1_id).await.unwrap().is_none());
    assert!(db.get_exercise(&e2_id).await.unwrap().is_none());
    assert!(db
        .get_approach(a1.id.as_ref().unwrap())
        .await
        .unwrap()
        .is_none());
    assert!(db
        .get_approach(a2.id.as_ref().unwrap())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_exercise_delete_cascades_to_approaches() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let workout = db.create_workout(&test_workout(&uid)).await.unwrap();
    let workout_id = workout.id.unwrap();
    let exercise = db.create_exercise(&test_exercise(&workout_id)).await.unwrap();
    let exercise_id = exercise.id.unwrap();
    let approach = db.create_approach(&test_approach(&exercise_id)).await.unwrap();

    let deleted = db.delete_exercise_cascade(&exercise_id).await.unwrap();
    assert_eq!(deleted, 2);

    assert!(db.get_exercise(&exercise_id).await.unwrap().is_none());
    assert!(db
        .get_approach(approach.id.as_ref().unwrap())
        .await
        .unwrap()
        .is_none());

    // The parent workout is untouched.
    assert!(db.get_workout(&workout_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_second_delete_resolves_to_not_found() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("alice");

    let workout = db.create_workout(&test_workout(&uid)).await.unwrap();
    let workout_id = workout.id.unwrap();

    db.delete_workout_cascade(&workout_id).await.unwrap();

    // The delete handler resolves before deleting, so a repeat request
    // fails chain resolution with NotFound rather than succeeding.
    let err = resolve_chain(&db, &uid, &ResourcePath::workout(&workout_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Workout")));
}
