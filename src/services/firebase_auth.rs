// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity Toolkit REST client for password sign-up and sign-in.
//!
//! Registration and login go through the provider's `accounts:signUp` and
//! `accounts:signInWithPassword` endpoints; the provider mints the ID token
//! the client presents on subsequent requests. Provider rejections (email
//! already registered, wrong password) map to 400; transport failures to 502.

use crate::error::AppError;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Session established with the identity provider.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    /// Provider-assigned user id
    pub uid: String,
    /// ID token the client presents as a bearer credential
    pub id_token: String,
}

/// Identity Toolkit API client.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuthClient {
    /// Create a new client with the project's web API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Register a new account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        self.credential_request("accounts:signUp", email, password)
            .await
    }

    /// Sign in to an existing account with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        self.credential_request("accounts:signInWithPassword", email, password)
            .await
    }

    async fn credential_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body: ProviderErrorBody = response.json().await.unwrap_or_default();
            let code = error_body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| format!("status {}", status));

            tracing::debug!(endpoint, code = %code, "Identity provider rejected credentials");
            return Err(AppError::BadRequest(describe_provider_error(&code)));
        }

        let session: CredentialResponse = response
            .json()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("invalid provider response: {}", e)))?;

        Ok(ProviderSession {
            uid: session.local_id,
            id_token: session.id_token,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    id_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Translate provider error codes into short user-facing messages.
///
/// Sign-in failures collapse into one message so responses do not disclose
/// whether an email is registered.
fn describe_provider_error(code: &str) -> String {
    // Codes may carry a suffix, e.g. "WEAK_PASSWORD : Password should be ...".
    let code = code.split(':').next().unwrap_or(code).trim();

    match code {
        "EMAIL_EXISTS" => "Email already registered".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password".to_string()
        }
        "INVALID_EMAIL" => "Invalid email address".to_string(),
        "WEAK_PASSWORD" => "Password is too weak".to_string(),
        "USER_DISABLED" => "Account is disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later".to_string(),
        other => format!("Authentication failed: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_known_provider_errors() {
        assert_eq!(
            describe_provider_error("EMAIL_EXISTS"),
            "Email already registered"
        );
        assert_eq!(
            describe_provider_error("EMAIL_NOT_FOUND"),
            "Invalid email or password"
        );
        assert_eq!(
            describe_provider_error("INVALID_PASSWORD"),
            "Invalid email or password"
        );
    }

    #[test]
    fn strips_provider_error_suffix() {
        assert_eq!(
            describe_provider_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password is too weak"
        );
    }

    #[test]
    fn passes_through_unknown_codes() {
        assert_eq!(
            describe_provider_error("OPERATION_NOT_ALLOWED"),
            "Authentication failed: OPERATION_NOT_ALLOWED"
        );
    }
}
