// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod approach;
pub mod exercise;
pub mod user;
pub mod workout;

pub use approach::Approach;
pub use exercise::Exercise;
pub use user::User;
pub use workout::Workout;
