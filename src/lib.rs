// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GymVoid: workout tracking backend
//!
//! This crate provides the backend API for tracking workouts, their
//! exercises, and their approaches (set records), with every resource
//! scoped to its owning user through a three-level ownership chain.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{FirebaseAuthClient, FirebaseTokenVerifier};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
    pub auth_client: FirebaseAuthClient,
}
