use crate::models::DbTutorProfile;
use chrono::{DateTime, Utc};
use eyre::Result;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, hourly_rate, status, subjects, bio, created_at, updated_at";

#[allow(clippy::too_many_arguments)]
pub async fn upsert_tutor_profile(
    pool: &Pool<Postgres>,
    id: Uuid,
    user_id: Uuid,
    hourly_rate: Option<Decimal>,
    status: &str,
    subjects: &[String],
    bio: Option<&str>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<DbTutorProfile> {
    let profile = sqlx::query_as::<_, DbTutorProfile>(&format!(
        r#"
        INSERT INTO tutor_profiles ({COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id)
        DO UPDATE SET hourly_rate = $3, subjects = $5, bio = $6, updated_at = $8
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(hourly_rate)
    .bind(status)
    .bind(subjects)
    .bind(bio)
    .bind(created_at)
    .bind(updated_at)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn get_tutor_profile_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbTutorProfile>> {
    let profile = sqlx::query_as::<_, DbTutorProfile>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM tutor_profiles
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_tutor_profile_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbTutorProfile>> {
    let profile = sqlx::query_as::<_, DbTutorProfile>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM tutor_profiles
        WHERE user_id = $1
        "#
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn update_tutor_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &str,
) -> Result<Option<DbTutorProfile>> {
    let profile = sqlx::query_as::<_, DbTutorProfile>(&format!(
        r#"
        UPDATE tutor_profiles
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn search_approved_tutors(
    pool: &Pool<Postgres>,
    subject: Option<&str>,
) -> Result<Vec<DbTutorProfile>> {
    let profiles = sqlx::query_as::<_, DbTutorProfile>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM tutor_profiles
        WHERE status = 'APPROVED'
          AND ($1::TEXT IS NULL OR EXISTS (
                SELECT 1 FROM UNNEST(subjects) AS s WHERE LOWER(s) = LOWER($1)
          ))
        ORDER BY created_at ASC
        "#
    ))
    .bind(subject)
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}
