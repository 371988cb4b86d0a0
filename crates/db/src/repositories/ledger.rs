use crate::models::DbLedgerEntry;
use chrono::Utc;
use eyre::Result;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn ensure_credit_account(conn: &mut PgConnection, owner_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO credit_accounts (owner_id, balance, updated_at)
        VALUES ($1, 0, NOW())
        ON CONFLICT (owner_id) DO NOTHING
        "#,
    )
    .bind(owner_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_balance(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Decimal> {
    let balance = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT balance
        FROM credit_accounts
        WHERE owner_id = $1
        "#,
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(balance.unwrap_or_default())
}

/// Locks the account row until the surrounding transaction ends.
pub async fn lock_balance(conn: &mut PgConnection, owner_id: Uuid) -> Result<Decimal> {
    let balance = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT balance
        FROM credit_accounts
        WHERE owner_id = $1
        FOR UPDATE
        "#,
    )
    .bind(owner_id)
    .fetch_one(conn)
    .await?;

    Ok(balance)
}

/// Adds `delta` (negative to debit) and returns the new balance.
pub async fn adjust_balance(
    conn: &mut PgConnection,
    owner_id: Uuid,
    delta: Decimal,
) -> Result<Decimal> {
    let balance = sqlx::query_scalar::<_, Decimal>(
        r#"
        UPDATE credit_accounts
        SET balance = balance + $2, updated_at = NOW()
        WHERE owner_id = $1
        RETURNING balance
        "#,
    )
    .bind(owner_id)
    .bind(delta)
    .fetch_one(conn)
    .await?;

    Ok(balance)
}

pub async fn add_tutor_earnings(
    conn: &mut PgConnection,
    tutor_id: Uuid,
    amount: Decimal,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tutor_payouts (tutor_id, earned, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (tutor_id)
        DO UPDATE SET earned = tutor_payouts.earned + EXCLUDED.earned, updated_at = NOW()
        "#,
    )
    .bind(tutor_id)
    .bind(amount)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_tutor_earnings(pool: &Pool<Postgres>, tutor_id: Uuid) -> Result<Decimal> {
    let earned = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT earned
        FROM tutor_payouts
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .fetch_optional(pool)
    .await?;

    Ok(earned.unwrap_or_default())
}

pub async fn create_ledger_entry(
    conn: &mut PgConnection,
    owner_id: Uuid,
    booking_id: Option<Uuid>,
    kind: &str,
    amount: Decimal,
) -> Result<DbLedgerEntry> {
    let entry = sqlx::query_as::<_, DbLedgerEntry>(
        r#"
        INSERT INTO ledger_entries (id, owner_id, booking_id, kind, amount, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, owner_id, booking_id, kind, amount, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(booking_id)
    .bind(kind)
    .bind(amount)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;

    Ok(entry)
}

pub async fn get_ledger_entries_by_owner_ids(
    pool: &Pool<Postgres>,
    owner_ids: &[Uuid],
) -> Result<Vec<DbLedgerEntry>> {
    let entries = sqlx::query_as::<_, DbLedgerEntry>(
        r#"
        SELECT id, owner_id, booking_id, kind, amount, created_at
        FROM ledger_entries
        WHERE owner_id = ANY($1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_ids)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
