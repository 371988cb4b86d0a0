use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use tutorly_core::models::booking::NewBooking;
use uuid::Uuid;

const COLUMNS: &str = "id, tutor_id, requester_id, account_id, subject, scheduled_at, \
                       duration_hours, status, cost_credits, tutor_earnings, created_at, resolved_at";

pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, tutor_id, requester_id, account_id, subject, scheduled_at,
                              duration_hours, status, cost_credits, tutor_earnings, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'REQUESTED', $8, $9, $10)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(booking.tutor_id)
    .bind(booking.requester_id)
    .bind(booking.account_id)
    .bind(&booking.subject)
    .bind(booking.scheduled_at)
    .bind(booking.duration_hours)
    .bind(booking.cost_credits)
    .bind(booking.tutor_earnings)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_tutor_id(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM bookings
        WHERE tutor_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(tutor_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_requester_id(
    pool: &Pool<Postgres>,
    requester_id: Uuid,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM bookings
        WHERE requester_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(requester_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Moves a booking out of `REQUESTED`. Returns `None` when the booking is
/// missing or no longer `REQUESTED`, so concurrent callers cannot both win.
pub async fn transition_requested_booking(
    conn: &mut PgConnection,
    id: Uuid,
    status: &str,
    resolved_at: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, resolved_at = $3
        WHERE id = $1 AND status = 'REQUESTED'
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .bind(resolved_at)
    .fetch_optional(conn)
    .await?;

    Ok(booking)
}

pub async fn get_booking_status(conn: &mut PgConnection, id: Uuid) -> Result<Option<String>> {
    let status = sqlx::query_scalar::<_, String>(
        r#"
        SELECT status
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(status)
}
