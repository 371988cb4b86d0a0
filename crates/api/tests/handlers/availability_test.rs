use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tutorly_core::models::{availability::AvailabilitySlot, identity::Role, tutor::TutorProfile};

use crate::test_utils::{Authorized, Envelope, TestApp};

#[tokio::test]
async fn test_save_and_read_weekly_availability() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;
    let profile: Envelope<TutorProfile> = app
        .server
        .put("/api/tutor/profile")
        .as_user(&tutor)
        .json(&json!({ "subjects": ["Maths"] }))
        .await
        .json();

    let saved = app
        .server
        .put("/api/tutor/availability")
        .as_user(&tutor)
        .json(&json!({
            "slots": [
                { "day_of_week": 5, "start_time": "14:00", "end_time": "16:00" },
                { "day_of_week": 1, "start_time": "09:00", "end_time": "12:00" },
            ]
        }))
        .await;
    assert_eq!(saved.status_code(), StatusCode::OK);

    let public: Value = app
        .server
        .get(&format!("/api/tutors/{}/availability", profile.data.id))
        .await
        .json();
    assert_eq!(
        public,
        json!([
            {
                "id": public[0]["id"],
                "tutor_id": profile.data.id,
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "12:00",
            },
            {
                "id": public[1]["id"],
                "tutor_id": profile.data.id,
                "day_of_week": 5,
                "start_time": "14:00",
                "end_time": "16:00",
            },
        ])
    );

    let own: Vec<AvailabilitySlot> = app
        .server
        .get("/api/tutor/availability")
        .as_user(&tutor)
        .await
        .json();
    assert_eq!(own.len(), 2);
}

#[tokio::test]
async fn test_invalid_slot_rejects_the_whole_request() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;
    app.server
        .put("/api/tutor/profile")
        .as_user(&tutor)
        .json(&json!({ "subjects": ["Maths"] }))
        .await;
    app.server
        .put("/api/tutor/availability")
        .as_user(&tutor)
        .json(&json!({ "slots": [{ "day_of_week": 2, "start_time": "10:00", "end_time": "11:00" }] }))
        .await;

    let response = app
        .server
        .put("/api/tutor/availability")
        .as_user(&tutor)
        .json(&json!({
            "slots": [
                { "day_of_week": 3, "start_time": "10:00", "end_time": "11:00" },
                { "day_of_week": 7, "start_time": "10:00", "end_time": "11:00" },
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let own: Vec<AvailabilitySlot> = app
        .server
        .get("/api/tutor/availability")
        .as_user(&tutor)
        .await
        .json();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].day_of_week, 2);
}

#[tokio::test]
async fn test_malformed_time_is_rejected() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;
    app.server
        .put("/api/tutor/profile")
        .as_user(&tutor)
        .json(&json!({ "subjects": ["Maths"] }))
        .await;

    let response = app
        .server
        .put("/api/tutor/availability")
        .as_user(&tutor)
        .json(&json!({ "slots": [{ "day_of_week": 1, "start_time": "9am", "end_time": "11:00" }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_students_cannot_publish_availability() {
    let app = TestApp::new();
    let student = app.sign_up(Role::Student).await;

    let response = app
        .server
        .put("/api/tutor/availability")
        .as_user(&student)
        .json(&json!({ "slots": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
