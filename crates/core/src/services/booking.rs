//! # Booking State Machine
//!
//! ```text
//! REQUESTED ──confirm──▶ CONFIRMED
//!     │
//!     └─────decline────▶ DECLINED
//! ```
//!
//! A booking is priced once, when it is requested, and keeps that price no
//! matter how the tutor's rate changes afterwards. It leaves `REQUESTED`
//! exactly once. The transition is a conditional write in the store, so when
//! two resolutions race only one of them succeeds and the other is reported
//! as `InvalidState`. Confirmation moves credits in the same write.

use chrono::{Datelike, Duration, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rust_decimal_macros::dec;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{DomainError, DomainResult},
    models::{
        booking::{
            Booking, BookingFilter, CreateBookingRequest, NewBooking, Resolution, ResolveOutcome,
        },
        identity::{Identity, Role},
        tutor::TutorStatus,
    },
    pricing,
    services::own_tutor_profile,
    store::Store,
};

const SECONDS_PER_HOUR: Decimal = dec!(3600);

/// Creates a `REQUESTED` booking with the tutor's current price locked in.
///
/// No balance check happens here; the paying account is only checked when
/// the tutor confirms.
pub async fn request_session(
    store: &dyn Store,
    identity: &Identity,
    request: &CreateBookingRequest,
) -> DomainResult<Booking> {
    if !identity.role.can_request_sessions() {
        return Err(DomainError::Unauthorized(format!(
            "Role {} cannot request sessions",
            identity.role
        )));
    }

    let subject = request.subject.trim();
    if subject.is_empty() {
        return Err(DomainError::Validation("Subject must not be empty".to_string()));
    }

    let duration_hours = request
        .duration_hours
        .unwrap_or(pricing::DEFAULT_DURATION_HOURS);
    if duration_hours <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "Duration must be greater than zero".to_string(),
        ));
    }
    if duration_hours > pricing::MAX_DURATION_HOURS {
        return Err(DomainError::Validation(format!(
            "Duration must not exceed {} hours",
            pricing::MAX_DURATION_HOURS
        )));
    }
    if duration_hours.scale() > 2 {
        return Err(DomainError::Validation(
            "Duration supports at most two decimal places".to_string(),
        ));
    }
    if request.scheduled_at <= Utc::now() {
        return Err(DomainError::Validation(
            "Sessions must be scheduled in the future".to_string(),
        ));
    }

    let tutor = store
        .get_tutor_profile(request.tutor_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Tutor {} not found", request.tutor_id)))?;
    if tutor.status != TutorStatus::Approved {
        return Err(DomainError::TutorUnavailable(format!(
            "Tutor {} is not approved",
            tutor.id
        )));
    }

    let seconds = (duration_hours * SECONDS_PER_HOUR)
        .round()
        .to_i64()
        .ok_or_else(|| DomainError::Validation("Duration is out of range".to_string()))?;
    let starts_at = request.scheduled_at;
    let ends_at = Duration::try_seconds(seconds)
        .and_then(|length| starts_at.checked_add_signed(length))
        .ok_or_else(|| DomainError::Validation("Duration is out of range".to_string()))?;
    if ends_at.date_naive() != starts_at.date_naive() {
        return Err(DomainError::TutorUnavailable(
            "Sessions cannot span midnight".to_string(),
        ));
    }

    let day_of_week = starts_at.weekday().num_days_from_sunday() as i16;
    let slots = store.get_availability(tutor.id).await?;
    if !slots
        .iter()
        .any(|slot| slot.covers(day_of_week, starts_at.time(), ends_at.time()))
    {
        return Err(DomainError::TutorUnavailable(format!(
            "Tutor {} is not available at {}",
            tutor.id, starts_at
        )));
    }

    let booking = store
        .create_booking(NewBooking {
            tutor_id: tutor.id,
            requester_id: identity.id,
            account_id: identity.paying_account(),
            subject: subject.to_string(),
            scheduled_at: starts_at,
            duration_hours,
            cost_credits: pricing::session_cost(tutor.hourly_rate, duration_hours),
            tutor_earnings: pricing::tutor_earnings(tutor.hourly_rate, duration_hours),
        })
        .await?;

    info!(
        booking_id = %booking.id,
        tutor_id = %booking.tutor_id,
        cost_credits = %booking.cost_credits,
        "session requested"
    );
    Ok(booking)
}

/// Confirms a booking, debiting the requester and crediting the tutor.
pub async fn confirm_session(
    store: &dyn Store,
    identity: &Identity,
    booking_id: Uuid,
) -> DomainResult<Booking> {
    resolve(store, identity, booking_id, Resolution::Confirm).await
}

/// Declines a booking. No credits move.
pub async fn decline_session(
    store: &dyn Store,
    identity: &Identity,
    booking_id: Uuid,
) -> DomainResult<Booking> {
    resolve(store, identity, booking_id, Resolution::Decline).await
}

async fn resolve(
    store: &dyn Store,
    identity: &Identity,
    booking_id: Uuid,
    resolution: Resolution,
) -> DomainResult<Booking> {
    let booking = store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Booking {} not found", booking_id)))?;
    authorize_tutor(store, identity, &booking).await?;

    match store
        .resolve_booking(booking_id, resolution, Utc::now())
        .await?
    {
        ResolveOutcome::Resolved(booking) => {
            info!(
                booking_id = %booking.id,
                status = %booking.status,
                "booking resolved"
            );
            Ok(booking)
        }
        ResolveOutcome::NotRequested(status) => {
            warn!(%booking_id, %status, "booking already resolved");
            Err(DomainError::InvalidState(format!(
                "Booking {} is already {}",
                booking_id, status
            )))
        }
        ResolveOutcome::InsufficientBalance {
            required,
            available,
        } => {
            warn!(%booking_id, %required, %available, "insufficient balance to confirm booking");
            Err(DomainError::InsufficientBalance {
                required,
                available,
            })
        }
        ResolveOutcome::Missing => Err(DomainError::NotFound(format!(
            "Booking {} not found",
            booking_id
        ))),
    }
}

/// Only the booked tutor, or an admin acting for them, may resolve a booking.
async fn authorize_tutor(
    store: &dyn Store,
    identity: &Identity,
    booking: &Booking,
) -> DomainResult<()> {
    if identity.is_admin() {
        return Ok(());
    }
    if identity.role == Role::Tutor {
        if let Some(profile) = store.get_tutor_profile_by_user(identity.id).await? {
            if profile.id == booking.tutor_id {
                return Ok(());
            }
        }
    }
    Err(DomainError::Unauthorized(format!(
        "Booking {} belongs to another tutor",
        booking.id
    )))
}

/// A single booking, visible to its participants and admins.
pub async fn get_booking(
    store: &dyn Store,
    identity: &Identity,
    booking_id: Uuid,
) -> DomainResult<Booking> {
    let booking = store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Booking {} not found", booking_id)))?;

    if booking.involves(identity.id)
        || identity.organization_id == Some(booking.account_id)
        || authorize_tutor(store, identity, &booking).await.is_ok()
    {
        Ok(booking)
    } else {
        Err(DomainError::Unauthorized(format!(
            "Booking {} is not visible to this user",
            booking_id
        )))
    }
}

/// Bookings of the caller: received ones for tutors, requested ones otherwise.
pub async fn list_bookings(store: &dyn Store, identity: &Identity) -> DomainResult<Vec<Booking>> {
    let filter = if identity.role == Role::Tutor {
        BookingFilter::Tutor(own_tutor_profile(store, identity).await?.id)
    } else {
        BookingFilter::Requester(identity.id)
    };
    store.list_bookings(filter).await
}
