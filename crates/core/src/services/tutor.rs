use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{DomainError, DomainResult},
    models::{
        identity::{Identity, Role},
        tutor::{SaveTutorProfileRequest, TutorProfile, TutorStatus},
    },
    services::require_admin,
    store::Store,
};

/// Creates the caller's profile (pending review) or updates its rate,
/// subjects and bio. Approval status is never changed here.
pub async fn save_tutor_profile(
    store: &dyn Store,
    identity: &Identity,
    request: &SaveTutorProfileRequest,
) -> DomainResult<TutorProfile> {
    if identity.role != Role::Tutor {
        return Err(DomainError::Unauthorized(
            "Only tutors can have a tutor profile".to_string(),
        ));
    }
    let subjects = request.validate()?;
    let now = Utc::now();

    let profile = match store.get_tutor_profile_by_user(identity.id).await? {
        Some(existing) => TutorProfile {
            hourly_rate: request.hourly_rate,
            subjects,
            bio: request.bio.clone(),
            updated_at: now,
            ..existing
        },
        None => TutorProfile {
            id: Uuid::new_v4(),
            user_id: identity.id,
            hourly_rate: request.hourly_rate,
            status: TutorStatus::Pending,
            subjects,
            bio: request.bio.clone(),
            created_at: now,
            updated_at: now,
        },
    };

    let saved = store.save_tutor_profile(profile).await?;
    info!(tutor_id = %saved.id, status = %saved.status, "tutor profile saved");
    Ok(saved)
}

pub async fn get_tutor(store: &dyn Store, tutor_id: Uuid) -> DomainResult<TutorProfile> {
    store
        .get_tutor_profile(tutor_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Tutor {} not found", tutor_id)))
}

pub async fn search_tutors(
    store: &dyn Store,
    subject: Option<&str>,
) -> DomainResult<Vec<TutorProfile>> {
    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    store.search_tutors(subject).await
}

pub async fn set_tutor_status(
    store: &dyn Store,
    identity: &Identity,
    tutor_id: Uuid,
    status: TutorStatus,
) -> DomainResult<TutorProfile> {
    require_admin(identity)?;
    let profile = store
        .set_tutor_status(tutor_id, status)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Tutor {} not found", tutor_id)))?;
    info!(tutor_id = %profile.id, status = %profile.status, "tutor status changed");
    Ok(profile)
}
