use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use tutorly_core::{
    errors::DomainError,
    models::identity::{LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse},
};

use crate::{
    ApiState,
    middleware::{
        auth::{self, CurrentUser},
        error_handling::{AppError, Success, success},
    },
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Success<RegisterResponse>>), AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_string();

    if state.store.get_user_by_email(&email).await?.is_some() {
        return Err(AppError(DomainError::Validation(
            "Email is already registered".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state
        .store
        .create_user(NewUser {
            email,
            name: payload.name.trim().to_string(),
            password_hash,
            role: payload.role,
            organization_id: payload.organization_id,
        })
        .await?;
    info!(user_id = %user.id, role = %user.role, "user registered");

    let response = RegisterResponse {
        id: user.id,
        email: user.email,
        role: user.role,
    };

    Ok((StatusCode::CREATED, success(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Success<LoginResponse>>, AppError> {
    let invalid = || AppError(DomainError::Authentication("Invalid email or password".to_string()));

    let user = state
        .store
        .get_user_by_email(payload.email.trim())
        .await?
        .ok_or_else(invalid)?;
    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = auth::generate_token();
    let expires_at = Utc::now() + state.session_ttl;
    state.store.create_session(&token, user.id, expires_at).await?;
    info!(user_id = %user.id, %expires_at, "session created");

    Ok(success(LoginResponse {
        token,
        expires_at,
        identity: user.identity(),
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Success<()>>, AppError> {
    state.store.delete_session(&current.token).await?;
    Ok(success(()))
}

/// Removes the caller's account along with its sessions and tutor data.
#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Success<()>>, AppError> {
    state.store.delete_user(current.identity.id).await?;
    info!(user_id = %current.identity.id, "account deleted");
    Ok(success(()))
}
