//! # Availability Store
//!
//! A tutor's weekly availability is saved as a whole: every save replaces the
//! previous set in one atomic write. Overlapping and duplicate slots are kept
//! exactly as submitted.

use tracing::info;
use uuid::Uuid;

use crate::{
    errors::DomainResult,
    models::{
        availability::{AvailabilitySlot, SaveAvailabilityRequest},
        identity::Identity,
    },
    services::own_tutor_profile,
    store::Store,
};

/// Replaces the caller's weekly availability with `request.slots`.
///
/// An empty list leaves the tutor with no availability.
pub async fn save_availability(
    store: &dyn Store,
    identity: &Identity,
    request: &SaveAvailabilityRequest,
) -> DomainResult<Vec<AvailabilitySlot>> {
    let slots = request.validate()?;
    let profile = own_tutor_profile(store, identity).await?;

    let saved = store.replace_availability(profile.id, &slots).await?;
    info!(tutor_id = %profile.id, slots = saved.len(), "availability replaced");
    Ok(saved)
}

/// The caller's own availability.
pub async fn get_availability(
    store: &dyn Store,
    identity: &Identity,
) -> DomainResult<Vec<AvailabilitySlot>> {
    let profile = own_tutor_profile(store, identity).await?;
    store.get_availability(profile.id).await
}

/// Public availability of any tutor, ordered by day of week.
pub async fn get_tutor_availability(
    store: &dyn Store,
    tutor_id: Uuid,
) -> DomainResult<Vec<AvailabilitySlot>> {
    store.get_availability(tutor_id).await
}
