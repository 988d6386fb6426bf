// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token verification.
//!
//! Every protected request presents a bearer ID token minted by the identity
//! provider. The token is opaque to the rest of the app: this module checks
//! the RS256 signature against the provider's published JWKS, validates the
//! issuer/audience for our project, and hands back the verified uid that
//! anchors all downstream ownership checks. Any rejection, whatever the
//! reason, surfaces uniformly as an invalid credential.

use crate::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const SECURETOKEN_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const CLOCK_SKEW_SECS: u64 = 60;

/// Verified caller identity extracted from a valid ID token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Provider-assigned user id, the trust anchor for ownership checks
    pub uid: String,
    pub email: Option<String>,
}

#[derive(Clone)]
enum VerifierMode {
    /// Fetch and cache the securetoken JWKS.
    Jwks,
    /// Fixed key for deterministic tests.
    StaticKey {
        kid: String,
        alg: Algorithm,
        decoding_key: Arc<DecodingKey>,
    },
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, Arc<DecodingKey>>,
    expires_at: Instant,
}

/// Verifier for provider-issued ID tokens.
pub struct FirebaseTokenVerifier {
    http_client: reqwest::Client,
    project_id: String,
    mode: VerifierMode,
    jwks_cache: RwLock<Option<JwksCacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl FirebaseTokenVerifier {
    /// Create a production verifier that fetches and caches the JWKS.
    pub fn new(project_id: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        tracing::info!(project = project_id, "Initialized ID token verifier");

        Ok(Self {
            http_client,
            project_id: project_id.to_string(),
            mode: VerifierMode::Jwks,
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Create a verifier with a fixed key and algorithm.
    ///
    /// This is intended for deterministic local/integration tests.
    pub fn new_with_static_key(
        project_id: &str,
        kid: impl Into<String>,
        alg: Algorithm,
        decoding_key: DecodingKey,
    ) -> anyhow::Result<Self> {
        let kid = kid.into();
        if kid.trim().is_empty() {
            anyhow::bail!("static verifier kid must not be empty");
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            project_id: project_id.to_string(),
            mode: VerifierMode::StaticKey {
                kid,
                alg,
                decoding_key: Arc::new(decoding_key),
            },
            jwks_cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    fn expected_alg(&self) -> Algorithm {
        match &self.mode {
            VerifierMode::Jwks => Algorithm::RS256,
            VerifierMode::StaticKey { alg, .. } => *alg,
        }
    }

    /// Verify a bearer ID token and extract the caller identity.
    ///
    /// Rejections are logged with their reason but reported uniformly as
    /// `InvalidToken`; only JWKS transport failures surface separately.
    pub async fn verify_id_token(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected token with invalid JWT header");
            AppError::InvalidToken
        })?;

        if header.alg != self.expected_alg() {
            tracing::debug!(alg = ?header.alg, "Rejected token with unexpected algorithm");
            return Err(AppError::InvalidToken);
        }

        let kid = header.kid.ok_or_else(|| {
            tracing::debug!("Rejected token without kid");
            AppError::InvalidToken
        })?;

        let decoding_key = self.decoding_key_for_kid(&kid).await?;

        let issuer = format!("{}{}", SECURETOKEN_ISSUER_PREFIX, self.project_id);
        let mut validation = Validation::new(self.expected_alg());
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.leeway = CLOCK_SKEW_SECS;

        let token_data = decode::<IdTokenClaims>(token, decoding_key.as_ref(), &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token failing claims validation");
                AppError::InvalidToken
            })?;

        let claims = token_data.claims;

        if claims.sub.trim().is_empty() {
            tracing::debug!("Rejected token with empty sub claim");
            return Err(AppError::InvalidToken);
        }

        Ok(VerifiedIdentity {
            uid: claims.sub,
            email: claims.email,
        })
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, AppError> {
        match &self.mode {
            VerifierMode::StaticKey {
                kid: static_kid,
                decoding_key,
                ..
            } => {
                if kid == static_kid {
                    return Ok(decoding_key.clone());
                }

                tracing::debug!(kid, "Unknown kid for static verifier");
                return Err(AppError::InvalidToken);
            }
            VerifierMode::Jwks => {}
        }

        if let Some(key) = self.lookup_cached_key(kid).await {
            return Ok(key);
        }

        // Unknown kid: the provider rotates keys, so refresh once before
        // giving up on the token.
        for force_refresh in [false, true] {
            self.refresh_jwks(force_refresh).await?;
            if let Some(key) = self.lookup_cached_key(kid).await {
                return Ok(key);
            }
        }

        tracing::debug!(kid, "kid not present in JWKS after refresh");
        Err(AppError::InvalidToken)
    }

    async fn lookup_cached_key(&self, kid: &str) -> Option<Arc<DecodingKey>> {
        let cache = self.jwks_cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    async fn refresh_jwks(&self, force_refresh: bool) -> Result<(), AppError> {
        let _guard = self.refresh_lock.lock().await;

        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(());
            }
        }

        tracing::debug!("Refreshing securetoken JWKS cache");

        let response = self
            .http_client
            .get(SECURETOKEN_JWKS_URL)
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("JWKS request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::IdentityProvider(format!(
                "JWKS request returned status {}",
                response.status()
            )));
        }

        let ttl = cache_ttl_from_headers(response.headers(), DEFAULT_CACHE_TTL);

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("invalid JWKS JSON: {}", e)))?;

        let mut keys_by_kid: HashMap<String, Arc<DecodingKey>> = HashMap::new();

        for jwk in jwks.keys {
            if jwk.kty != "RSA" || jwk.kid.trim().is_empty() {
                continue;
            }

            if let Some(alg) = &jwk.alg {
                if alg != "RS256" {
                    continue;
                }
            }

            if let Some(use_) = &jwk.use_ {
                if use_ != "sig" {
                    continue;
                }
            }

            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys_by_kid.insert(jwk.kid, Arc::new(key));
                }
                Err(e) => {
                    tracing::warn!(error = %e, kid = %jwk.kid, "Skipping invalid RSA JWKS key");
                }
            }
        }

        if keys_by_kid.is_empty() {
            return Err(AppError::IdentityProvider(
                "JWKS response did not include any usable RSA keys".to_string(),
            ));
        }

        let entry = JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + ttl,
        };

        *self.jwks_cache.write().await = Some(entry);

        tracing::debug!(ttl_secs = ttl.as_secs(), "securetoken JWKS cache refreshed");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    n: String,
    e: String,
    #[serde(rename = "use")]
    use_: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
}

/// Extract the token from a bearer Authorization header value.
///
/// A missing header is the caller's concern; this handles the present-but-
/// malformed cases.
pub fn extract_bearer_token(value: &str) -> Result<&str, AppError> {
    let token = value.strip_prefix("Bearer ").ok_or(AppError::NoToken)?;

    if token.trim().is_empty() {
        return Err(AppError::NoToken);
    }

    Ok(token)
}

fn cache_ttl_from_headers(headers: &reqwest::header::HeaderMap, fallback: Duration) -> Duration {
    let Some(max_age) = headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_cache_control_max_age)
    else {
        return fallback;
    };

    Duration::from_secs(max_age)
}

fn parse_cache_control_max_age(value: &str) -> Option<u64> {
    for directive in value.split(',') {
        let directive = directive.trim();

        if let Some(raw) = directive.strip_prefix("max-age=") {
            let raw = raw.trim_matches('"');
            if let Ok(seconds) = raw.parse::<u64>() {
                return Some(seconds);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const TEST_SECRET: &[u8] = b"test_signing_key_32_bytes_long!!";
    const TEST_KID: &str = "test-kid";
    const TEST_PROJECT: &str = "test-project";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        aud: String,
        iss: String,
        exp: usize,
        iat: usize,
        email: Option<String>,
    }

    fn static_verifier() -> FirebaseTokenVerifier {
        FirebaseTokenVerifier::new_with_static_key(
            TEST_PROJECT,
            TEST_KID,
            Algorithm::HS256,
            DecodingKey::from_secret(TEST_SECRET),
        )
        .unwrap()
    }

    fn mint_token(claims: &TestClaims) -> String {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(TEST_KID.to_string());
        encode(&header, claims, &EncodingKey::from_secret(TEST_SECRET)).unwrap()
    }

    fn valid_claims(uid: &str) -> TestClaims {
        let now = chrono::Utc::now().timestamp() as usize;
        TestClaims {
            sub: uid.to_string(),
            aud: TEST_PROJECT.to_string(),
            iss: format!("{}{}", SECURETOKEN_ISSUER_PREFIX, TEST_PROJECT),
            exp: now + 3600,
            iat: now,
            email: Some("alice@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn verifies_valid_token() {
        let verifier = static_verifier();
        let token = mint_token(&valid_claims("user-1"));

        let identity = verifier.verify_id_token(&token).await.unwrap();
        assert_eq!(identity.uid, "user-1");
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let verifier = static_verifier();

        let err = verifier.verify_id_token("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let verifier = static_verifier();
        let mut claims = valid_claims("user-1");
        claims.aud = "some-other-project".to_string();

        let err = verifier
            .verify_id_token(&mint_token(&claims))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_wrong_issuer() {
        let verifier = static_verifier();
        let mut claims = valid_claims("user-1");
        claims.iss = "https://evil.example.com/".to_string();

        let err = verifier
            .verify_id_token(&mint_token(&claims))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let verifier = static_verifier();
        let now = chrono::Utc::now().timestamp() as usize;
        let mut claims = valid_claims("user-1");
        // Further in the past than the clock-skew leeway.
        claims.exp = now - 7200;
        claims.iat = now - 10800;

        let err = verifier
            .verify_id_token(&mint_token(&claims))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_unknown_kid() {
        let verifier = static_verifier();
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("other-kid".to_string());
        let token = encode(
            &header,
            &valid_claims("user-1"),
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        let err = verifier.verify_id_token(&token).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn extract_bearer_token_works() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(matches!(
            extract_bearer_token("Basic abc"),
            Err(AppError::NoToken)
        ));
        assert!(matches!(
            extract_bearer_token("Bearer "),
            Err(AppError::NoToken)
        ));
    }

    #[test]
    fn parse_cache_control_max_age_valid() {
        assert_eq!(
            parse_cache_control_max_age("public, max-age=3600"),
            Some(3600)
        );
        assert_eq!(parse_cache_control_max_age("max-age=\"120\""), Some(120));
    }

    #[test]
    fn parse_cache_control_max_age_invalid() {
        assert_eq!(parse_cache_control_max_age("public, immutable"), None);
        assert_eq!(parse_cache_control_max_age("max-age=abc"), None);
        assert_eq!(parse_cache_control_max_age(""), None);
    }
}
