use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use tutorly_core::models::{
    identity::Role,
    tutor::{TutorProfile, TutorStatus},
};
use uuid::Uuid;

use crate::test_utils::{Account, Authorized, Envelope, TestApp};

async fn profile(app: &TestApp, tutor: &Account, subjects: &[&str]) -> TutorProfile {
    let response = app
        .server
        .put("/api/tutor/profile")
        .as_user(tutor)
        .json(&json!({ "hourly_rate": 30, "subjects": subjects, "bio": "Patient and precise" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Envelope<TutorProfile>>().data
}

async fn approve(app: &TestApp, admin: &Account, tutor_id: Uuid) {
    let response = app
        .server
        .put(&format!("/api/admin/tutors/{}/status", tutor_id))
        .as_user(admin)
        .json(&json!({ "status": "APPROVED" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_new_profile_is_pending_until_approved() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;
    let admin = app.admin().await;

    let created = profile(&app, &tutor, &["Physics"]).await;
    assert_eq!(created.status, TutorStatus::Pending);
    assert_eq!(created.hourly_rate, Some(dec!(30)));

    let hidden: Vec<TutorProfile> = app.server.get("/api/tutors").await.json();
    assert!(hidden.iter().all(|t| t.id != created.id));

    approve(&app, &admin, created.id).await;

    let listed: Vec<TutorProfile> = app.server.get("/api/tutors").await.json();
    assert!(listed.iter().any(|t| t.id == created.id));
}

#[tokio::test]
async fn test_updating_profile_keeps_status() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;
    let admin = app.admin().await;
    let created = profile(&app, &tutor, &["Physics"]).await;
    approve(&app, &admin, created.id).await;

    let updated = profile(&app, &tutor, &["Physics", "Chemistry"]).await;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, TutorStatus::Approved);
    assert_eq!(updated.subjects, vec!["Physics", "Chemistry"]);
}

#[tokio::test]
async fn test_search_filters_by_subject_case_insensitively() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let physics = app.sign_up(Role::Tutor).await;
    let french = app.sign_up(Role::Tutor).await;
    let physics_profile = profile(&app, &physics, &["Physics"]).await;
    let french_profile = profile(&app, &french, &["French"]).await;
    approve(&app, &admin, physics_profile.id).await;
    approve(&app, &admin, french_profile.id).await;

    let found: Vec<TutorProfile> = app.server.get("/api/tutors?subject=physics").await.json();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, physics_profile.id);
}

#[tokio::test]
async fn test_out_of_range_rate_is_rejected() {
    let app = TestApp::new();
    let tutor = app.sign_up(Role::Tutor).await;

    for rate in [json!(-5), json!(100000000), json!(20.005)] {
        let response = app
            .server
            .put("/api/tutor/profile")
            .as_user(&tutor)
            .json(&json!({ "hourly_rate": rate, "subjects": ["Maths"] }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", rate);
    }
}

#[tokio::test]
async fn test_only_tutors_have_profiles_and_only_admins_approve() {
    let app = TestApp::new();
    let parent = app.sign_up(Role::Parent).await;
    let tutor = app.sign_up(Role::Tutor).await;
    let created = profile(&app, &tutor, &["Maths"]).await;

    let as_parent = app
        .server
        .put("/api/tutor/profile")
        .as_user(&parent)
        .json(&json!({ "subjects": ["Maths"] }))
        .await;
    assert_eq!(as_parent.status_code(), StatusCode::FORBIDDEN);

    let self_approval = app
        .server
        .put(&format!("/api/admin/tutors/{}/status", created.id))
        .as_user(&tutor)
        .json(&json!({ "status": "APPROVED" }))
        .await;
    assert_eq!(self_approval.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_tutor_is_not_found() {
    let app = TestApp::new();

    let response = app
        .server
        .get(&format!("/api/tutors/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
