// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - identity provider integration.

pub mod firebase_auth;
pub mod identity;

pub use firebase_auth::{FirebaseAuthClient, ProviderSession};
pub use identity::{FirebaseTokenVerifier, VerifiedIdentity};
