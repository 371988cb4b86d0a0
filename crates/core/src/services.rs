//! Domain operations.
//!
//! Each operation takes the [`Store`](crate::store::Store) and the calling
//! [`Identity`](crate::models::identity::Identity) explicitly, validates its
//! input before touching storage, and reports failure as a
//! [`DomainError`](crate::errors::DomainError).

pub mod availability;
pub mod booking;
pub mod ledger;
pub mod tutor;

use crate::{
    errors::{DomainError, DomainResult},
    models::{
        identity::{Identity, Role},
        tutor::TutorProfile,
    },
    store::Store,
};

/// The tutor profile owned by the caller.
///
/// Fails with `Unauthorized` for non-tutors and `NotFound` when the tutor has
/// not created a profile yet.
pub(crate) async fn own_tutor_profile(
    store: &dyn Store,
    identity: &Identity,
) -> DomainResult<TutorProfile> {
    if identity.role != Role::Tutor {
        return Err(DomainError::Unauthorized(
            "Only tutors can perform this action".to_string(),
        ));
    }
    store
        .get_tutor_profile_by_user(identity.id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Tutor profile not found".to_string()))
}

pub(crate) fn require_admin(identity: &Identity) -> DomainResult<()> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(
            "Only administrators can perform this action".to_string(),
        ))
    }
}
