#![allow(dead_code)]

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use rust_decimal::Decimal;
use tutorly_core::{
    models::{
        availability::{AvailabilitySlotRequest, SaveAvailabilityRequest},
        identity::{Identity, NewUser, Role},
        tutor::{SaveTutorProfileRequest, TutorProfile, TutorStatus},
    },
    services,
    store::{MemoryStore, Store},
};
use uuid::Uuid;

pub async fn user(store: &MemoryStore, role: Role) -> Identity {
    user_in(store, role, None).await
}

pub async fn user_in(store: &MemoryStore, role: Role, organization_id: Option<Uuid>) -> Identity {
    let email: String = SafeEmail().fake();
    let name: String = Name().fake();
    store
        .create_user(NewUser {
            email: format!("{}.{}", Uuid::new_v4().simple(), email),
            name,
            password_hash: "not-a-real-hash".to_string(),
            role,
            organization_id,
        })
        .await
        .expect("create user")
        .identity()
}

/// A tutor with an approved profile at `hourly_rate`.
pub async fn approved_tutor(
    store: &MemoryStore,
    hourly_rate: Option<Decimal>,
) -> (Identity, TutorProfile) {
    let tutor = user(store, Role::Tutor).await;
    let admin = user(store, Role::Admin).await;
    let profile = services::tutor::save_tutor_profile(
        store,
        &tutor,
        &SaveTutorProfileRequest {
            hourly_rate,
            subjects: vec!["Maths".to_string()],
            bio: None,
        },
    )
    .await
    .expect("save profile");
    let profile =
        services::tutor::set_tutor_status(store, &admin, profile.id, TutorStatus::Approved)
            .await
            .expect("approve tutor");
    (tutor, profile)
}

pub fn slot(day_of_week: i16, start: &str, end: &str) -> AvailabilitySlotRequest {
    AvailabilitySlotRequest {
        day_of_week,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

pub fn slots(slots: Vec<AvailabilitySlotRequest>) -> SaveAvailabilityRequest {
    SaveAvailabilityRequest { slots }
}

/// The first Monday strictly after today (UTC).
pub fn next_monday() -> NaiveDate {
    let today = Utc::now().date_naive();
    today + Duration::days(7 - i64::from(today.weekday().num_days_from_monday()))
}

/// Next Monday at the given UTC time.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    next_monday()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
        .and_utc()
}
