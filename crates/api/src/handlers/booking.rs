use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tutorly_core::{
    models::booking::{Booking, CreateBookingRequest},
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

/// Requests a session. The price is fixed on the booking at this point.
#[axum::debug_handler]
pub async fn request_session(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Success<Booking>>), AppError> {
    let booking =
        services::booking::request_session(state.store.as_ref(), &current.identity, &payload)
            .await?;
    Ok((StatusCode::CREATED, success(booking)))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings =
        services::booking::list_bookings(state.store.as_ref(), &current.identity).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking =
        services::booking::get_booking(state.store.as_ref(), &current.identity, id).await?;
    Ok(Json(booking))
}

/// Confirms a requested session and settles its cost.
///
/// Answers `409` when the booking was already resolved and `402` when the
/// paying account cannot cover the cost.
#[axum::debug_handler]
pub async fn confirm_session(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Success<Booking>>, AppError> {
    let booking =
        services::booking::confirm_session(state.store.as_ref(), &current.identity, id).await?;
    Ok(success(booking))
}

#[axum::debug_handler]
pub async fn decline_session(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Success<Booking>>, AppError> {
    let booking =
        services::booking::decline_session(state.store.as_ref(), &current.identity, id).await?;
    Ok(success(booking))
}
