use axum::http::StatusCode;
use chrono::{DateTime, Datelike, Duration, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tutorly_core::models::{
    booking::{Booking, BookingStatus},
    identity::Role,
    ledger::{BalanceResponse, EarningsResponse, LedgerEntry, LedgerEntryKind},
    tutor::TutorProfile,
};
use uuid::Uuid;

use crate::test_utils::{Account, Authorized, Envelope, TestApp};

/// Next Monday at the given UTC time.
fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    let today = Utc::now().date_naive();
    let monday = today + Duration::days(7 - i64::from(today.weekday().num_days_from_monday()));
    monday.and_hms_opt(hour, minute, 0).unwrap().and_utc()
}

/// Inside the tutor's Monday 09:00-17:00 slot.
fn monday_ten() -> DateTime<Utc> {
    monday_at(10, 0)
}

struct Marketplace {
    app: TestApp,
    admin: Account,
    tutor: Account,
    tutor_id: Uuid,
    parent: Account,
}

async fn marketplace(rate: Option<Decimal>, credits: Decimal) -> Marketplace {
    let app = TestApp::new();
    let admin = app.admin().await;
    let tutor = app.sign_up(Role::Tutor).await;
    let parent = app.sign_up(Role::Parent).await;

    let profile: Envelope<TutorProfile> = app
        .server
        .put("/api/tutor/profile")
        .as_user(&tutor)
        .json(&json!({ "hourly_rate": rate, "subjects": ["Maths"] }))
        .await
        .json();
    let tutor_id = profile.data.id;
    app.server
        .put(&format!("/api/admin/tutors/{}/status", tutor_id))
        .as_user(&admin)
        .json(&json!({ "status": "APPROVED" }))
        .await;
    app.server
        .put("/api/tutor/availability")
        .as_user(&tutor)
        .json(&json!({
            "slots": [{ "day_of_week": 1, "start_time": "09:00", "end_time": "17:00" }]
        }))
        .await;

    if credits > Decimal::ZERO {
        let topped_up = app
            .server
            .post("/api/admin/credits")
            .as_user(&admin)
            .json(&json!({ "account_id": parent.id, "amount": credits }))
            .await;
        assert_eq!(topped_up.status_code(), StatusCode::OK);
    }

    Marketplace {
        app,
        admin,
        tutor,
        tutor_id,
        parent,
    }
}

impl Marketplace {
    async fn request(
        &self,
        requester: &Account,
        scheduled_at: DateTime<Utc>,
    ) -> axum_test::TestResponse {
        self.app
            .server
            .post("/api/bookings")
            .as_user(requester)
            .json(&json!({
                "tutor_id": self.tutor_id,
                "subject": "Maths",
                "scheduled_at": scheduled_at,
            }))
            .await
    }

    async fn requested(&self) -> Booking {
        let response = self.request(&self.parent, monday_ten()).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Envelope<Booking>>().data
    }

    async fn resolve(&self, as_user: &Account, id: Uuid, action: &str) -> axum_test::TestResponse {
        self.app
            .server
            .post(&format!("/api/bookings/{}/{}", id, action))
            .as_user(as_user)
            .await
    }

    async fn balance(&self, account: &Account) -> Decimal {
        self.app
            .server
            .get("/api/credits/balance")
            .as_user(account)
            .await
            .json::<BalanceResponse>()
            .balance
    }
}

#[test_log::test(tokio::test)]
async fn test_request_confirm_settles_credits() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;

    let booking = market.requested().await;
    assert_eq!(booking.status, BookingStatus::Requested);
    assert_eq!(booking.cost_credits, dec!(0.96));
    assert_eq!(booking.account_id, market.parent.id);

    let response = market.resolve(&market.tutor, booking.id, "confirm").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let confirmed = response.json::<Envelope<Booking>>();
    assert!(confirmed.success);
    assert_eq!(confirmed.data.status, BookingStatus::Confirmed);

    assert_eq!(market.balance(&market.parent).await, dec!(9.04));
    let earnings: EarningsResponse = market
        .app
        .server
        .get("/api/tutor/earnings")
        .as_user(&market.tutor)
        .await
        .json();
    assert_eq!(earnings.earnings, dec!(20));

    let ledger: Vec<LedgerEntry> = market
        .app
        .server
        .get("/api/credits/ledger")
        .as_user(&market.parent)
        .await
        .json();
    let kinds: Vec<LedgerEntryKind> = ledger.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![LedgerEntryKind::Debit, LedgerEntryKind::TopUp]);
}

#[tokio::test]
async fn test_second_resolution_conflicts() {
    let market = marketplace(None, dec!(5)).await;
    let booking = market.requested().await;
    assert_eq!(booking.cost_credits, dec!(1));

    let first = market.resolve(&market.tutor, booking.id, "confirm").await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let again = market.resolve(&market.tutor, booking.id, "confirm").await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
    let decline = market.resolve(&market.admin, booking.id, "decline").await;
    assert_eq!(decline.status_code(), StatusCode::CONFLICT);

    assert_eq!(market.balance(&market.parent).await, dec!(4));
}

#[tokio::test]
async fn test_confirm_without_enough_credits_is_payment_required() {
    let market = marketplace(Some(dec!(20)), dec!(0.5)).await;
    let booking = market.requested().await;

    let response = market.resolve(&market.tutor, booking.id, "confirm").await;

    assert_eq!(response.status_code(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = response.json();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Insufficient balance: 0.96 credits required")
    );

    let unchanged: Booking = market
        .app
        .server
        .get(&format!("/api/bookings/{}", booking.id))
        .as_user(&market.parent)
        .await
        .json();
    assert_eq!(unchanged.status, BookingStatus::Requested);
}

#[tokio::test]
async fn test_decline_moves_no_credits() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;
    let booking = market.requested().await;

    let response = market.resolve(&market.tutor, booking.id, "decline").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Envelope<Booking>>().data.status,
        BookingStatus::Declined
    );
    assert_eq!(market.balance(&market.parent).await, dec!(10));
}

#[tokio::test]
async fn test_requester_cannot_resolve_own_booking() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;
    let booking = market.requested().await;

    let response = market.resolve(&market.parent, booking.id, "confirm").await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_request_outside_availability_is_unprocessable() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;

    // 16:30 + 1h runs past the 17:00 end of the slot.
    let late = market.request(&market.parent, monday_at(16, 30)).await;
    assert_eq!(late.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // Tuesday has no slot.
    let tuesday = market.request(&market.parent, monday_ten() + Duration::days(1)).await;
    assert_eq!(tuesday.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_tutors_cannot_request_sessions() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;

    let response = market.request(&market.tutor, monday_ten()).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_past_sessions_are_rejected() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;

    let response = market.request(&market.parent, monday_ten() - Duration::weeks(2)).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bookings_are_visible_to_participants_only() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;
    let booking = market.requested().await;
    let stranger = market.app.sign_up(Role::Parent).await;

    let as_tutor: Vec<Booking> = market
        .app
        .server
        .get("/api/bookings")
        .as_user(&market.tutor)
        .await
        .json();
    assert_eq!(as_tutor.len(), 1);
    assert_eq!(as_tutor[0].id, booking.id);

    let as_stranger = market
        .app
        .server
        .get(&format!("/api/bookings/{}", booking.id))
        .as_user(&stranger)
        .await;
    assert_eq!(as_stranger.status_code(), StatusCode::FORBIDDEN);

    let listed: Vec<Booking> = market
        .app
        .server
        .get("/api/bookings")
        .as_user(&stranger)
        .await
        .json();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_school_pays_for_its_students() {
    let market = marketplace(Some(dec!(20)), Decimal::ZERO).await;
    let school = market.app.sign_up(Role::School).await;
    let student = market.app.sign_up_in(Role::Student, Some(school.id)).await;
    market
        .app
        .server
        .post("/api/admin/credits")
        .as_user(&market.admin)
        .json(&json!({ "account_id": school.id, "amount": 5 }))
        .await;

    let response = market.request(&student, monday_ten()).await;
    let booking = response.json::<Envelope<Booking>>().data;
    assert_eq!(booking.account_id, school.id);

    market.resolve(&market.tutor, booking.id, "confirm").await;

    assert_eq!(market.balance(&school).await, dec!(4.04));
    assert_eq!(market.balance(&student).await, dec!(4.04));

    let unknown = market
        .resolve(&market.tutor, Uuid::new_v4(), "confirm")
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_duration_is_bad_request() {
    let market = marketplace(Some(dec!(20)), dec!(10)).await;

    for hours in [json!(10000000000000_u64), json!(25), json!(1.333)] {
        let response = market
            .app
            .server
            .post("/api/bookings")
            .as_user(&market.parent)
            .json(&json!({
                "tutor_id": market.tutor_id,
                "subject": "Maths",
                "scheduled_at": monday_ten(),
                "duration_hours": hours,
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
