use std::sync::Arc;

use axum::http::StatusCode;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tutorly_core::{
    errors::DomainError,
    models::{
        booking::{BookingStatus, Resolution, ResolveOutcome},
        identity::{Identity, Role},
        tutor::{TutorProfile, TutorStatus},
    },
};
use tutorly_db::mock::MockStore;
use uuid::Uuid;

use crate::test_utils::{bearer, server_with};

const TOKEN: &str = "mock-session-token";

fn signed_in(store: &mut MockStore, identity: Identity) {
    store
        .expect_identity_for_token()
        .withf(|token, _| token == TOKEN)
        .returning(move |_, _| Ok(Some(identity.clone())));
}

fn tutor_profile(user_id: Uuid) -> TutorProfile {
    let now = chrono::Utc::now();
    TutorProfile {
        id: Uuid::new_v4(),
        user_id,
        hourly_rate: Some(dec!(20)),
        status: TutorStatus::Approved,
        subjects: vec!["Maths".to_string()],
        bio: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_search_tutors()
        .with(eq(Some("Maths".to_string())))
        .times(1)
        .returning(|_| Err(DomainError::Transaction(eyre::eyre!("connection reset"))));
    let server = server_with(Arc::new(store));

    let response = server.get("/api/tutors?subject=Maths").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_session_lookup_failure_is_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_identity_for_token()
        .returning(|_, _| Err(DomainError::Transaction(eyre::eyre!("pool timed out"))));
    let server = server_with(Arc::new(store));

    let (name, value) = bearer(TOKEN);
    let response = server.get("/api/bookings").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_lost_confirmation_race_is_conflict() {
    let tutor = Identity {
        id: Uuid::new_v4(),
        role: Role::Tutor,
        organization_id: None,
    };
    let profile = tutor_profile(tutor.id);
    let booking_id = Uuid::new_v4();
    let tutor_id = profile.id;

    let mut store = MockStore::new();
    signed_in(&mut store, tutor.clone());
    store
        .expect_get_tutor_profile_by_user()
        .with(eq(tutor.id))
        .returning(move |_| Ok(Some(profile.clone())));
    store.expect_get_booking().with(eq(booking_id)).returning(move |id| {
        let now = chrono::Utc::now();
        Ok(Some(tutorly_core::models::booking::Booking {
            id,
            tutor_id,
            requester_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            subject: "Maths".to_string(),
            scheduled_at: now + chrono::Duration::days(3),
            duration_hours: dec!(1),
            status: BookingStatus::Requested,
            cost_credits: dec!(0.96),
            tutor_earnings: dec!(20),
            created_at: now,
            resolved_at: None,
        }))
    });
    // Another request confirmed it between the read and the write.
    store
        .expect_resolve_booking()
        .withf(move |id, resolution, _| *id == booking_id && *resolution == Resolution::Confirm)
        .times(1)
        .returning(|_, _, _| Ok(ResolveOutcome::NotRequested(BookingStatus::Confirmed)));
    let server = server_with(Arc::new(store));

    let (name, value) = bearer(TOKEN);
    let response = server
        .post(&format!("/api/bookings/{}/confirm", booking_id))
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}
