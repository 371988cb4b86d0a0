//! # Availability Handlers
//!
//! A tutor publishes a weekly set of recurring slots. Saving replaces the
//! whole set at once; the public read returns it ordered by day, then start
//! time, so clients can render a week view without sorting.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tutorly_core::{
    models::availability::{AvailabilitySlot, SaveAvailabilityRequest},
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

/// Replaces the caller's availability.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tutor/availability
/// {"slots": [{"day_of_week": 1, "start_time": "09:00", "end_time": "12:00"}]}
/// ```
///
/// # Errors
///
/// * `Validation` - a slot has a day outside 0..=6, a malformed time, or an
///   empty range; nothing is stored in that case
/// * `Unauthorized` - caller is not a tutor
/// * `NotFound` - caller has no tutor profile yet
#[axum::debug_handler]
pub async fn save_availability(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(payload): Json<SaveAvailabilityRequest>,
) -> Result<Json<Success<Vec<AvailabilitySlot>>>, AppError> {
    let slots =
        services::availability::save_availability(state.store.as_ref(), &current.identity, &payload)
            .await?;
    Ok(success(slots))
}

#[axum::debug_handler]
pub async fn get_own_availability(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    let slots =
        services::availability::get_availability(state.store.as_ref(), &current.identity).await?;
    Ok(Json(slots))
}

/// Public weekly availability of one tutor.
#[axum::debug_handler]
pub async fn get_tutor_availability(
    State(state): State<Arc<ApiState>>,
    Path(tutor_id): Path<Uuid>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    let slots =
        services::availability::get_tutor_availability(state.store.as_ref(), tutor_id).await?;
    Ok(Json(slots))
}
