//! # Authentication Module
//!
//! Password hashing for accounts and the bearer-token extractor that resolves
//! a login session into an [`Identity`].
//!
//! Passwords are stored as Argon2 PHC strings. Session tokens are opaque
//! random strings kept by the store together with their expiry.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use eyre::Result;
use rand::{Rng, distributions::Alphanumeric};
use tutorly_core::{errors::DomainError, models::identity::Identity};

use crate::{ApiState, middleware::error_handling::AppError};

const TOKEN_LENGTH: usize = 48;

/// Hashes a password with a fresh random salt and default Argon2 parameters.
///
/// ```rust
/// let hashed = tutorly_api::middleware::auth::hash_password("correct horse").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generates an opaque session token.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// The authenticated caller of a protected endpoint.
///
/// Extraction fails with `401` when the `Authorization: Bearer` header is
/// missing or names an unknown or expired session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: Identity,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            DomainError::Authentication("Missing bearer token".to_string())
        })?;

        let identity = state
            .store
            .identity_for_token(token, Utc::now())
            .await?
            .ok_or_else(|| {
                DomainError::Authentication("Session is invalid or has expired".to_string())
            })?;

        Ok(Self {
            identity,
            token: token.to_string(),
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
