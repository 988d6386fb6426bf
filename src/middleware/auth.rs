// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication middleware.

use crate::error::AppError;
use crate::services::identity::extract_bearer_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated caller extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

/// Middleware that requires a valid provider ID token.
///
/// A missing or blank Authorization header is 401; a present-but-rejected
/// token is 403. Neither case touches the store.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::NoToken)?;

    let token = extract_bearer_token(auth_header)?;

    let identity = state.token_verifier.verify_id_token(token).await?;

    request.extensions_mut().insert(AuthUser {
        uid: identity.uid,
    });

    Ok(next.run(request).await)
}
