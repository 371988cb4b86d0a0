use crate::models::DbAvailabilitySlot;
use chrono::NaiveTime;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn create_availability_slot(
    conn: &mut PgConnection,
    tutor_id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbAvailabilitySlot> {
    let id = Uuid::new_v4();

    let slot = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        INSERT INTO availability_slots (id, tutor_id, day_of_week, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, tutor_id, day_of_week, start_time, end_time
        "#,
    )
    .bind(id)
    .bind(tutor_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(conn)
    .await?;

    Ok(slot)
}

pub async fn get_availability_slots_by_tutor_id(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
) -> Result<Vec<DbAvailabilitySlot>> {
    let slots = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, tutor_id, day_of_week, start_time, end_time
        FROM availability_slots
        WHERE tutor_id = $1
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(tutor_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn delete_availability_slots_by_tutor_id(
    conn: &mut PgConnection,
    tutor_id: Uuid,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM availability_slots
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
