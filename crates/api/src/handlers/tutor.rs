use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;
use tutorly_core::{
    models::tutor::{SaveTutorProfileRequest, SetTutorStatusRequest, TutorProfile, TutorSearchQuery},
    services,
};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::CurrentUser,
        error_handling::{AppError, Success, success},
    },
};

#[axum::debug_handler]
pub async fn save_profile(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(payload): Json<SaveTutorProfileRequest>,
) -> Result<Json<Success<TutorProfile>>, AppError> {
    let profile =
        services::tutor::save_tutor_profile(state.store.as_ref(), &current.identity, &payload)
            .await?;
    Ok(success(profile))
}

#[axum::debug_handler]
pub async fn search_tutors(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TutorSearchQuery>,
) -> Result<Json<Vec<TutorProfile>>, AppError> {
    let tutors =
        services::tutor::search_tutors(state.store.as_ref(), query.subject.as_deref()).await?;
    Ok(Json(tutors))
}

#[axum::debug_handler]
pub async fn get_tutor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TutorProfile>, AppError> {
    let tutor = services::tutor::get_tutor(state.store.as_ref(), id).await?;
    Ok(Json(tutor))
}

#[axum::debug_handler]
pub async fn set_status(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetTutorStatusRequest>,
) -> Result<Json<Success<TutorProfile>>, AppError> {
    let profile = services::tutor::set_tutor_status(
        state.store.as_ref(),
        &current.identity,
        id,
        payload.status,
    )
    .await?;
    Ok(success(profile))
}
