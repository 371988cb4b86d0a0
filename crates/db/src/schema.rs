use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Schema statements in dependency order. Each is idempotent.
const STATEMENTS: &[&str] = &[
    // Users
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email VARCHAR(255) NOT NULL,
        name VARCHAR(255) NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        role VARCHAR(32) NOT NULL,
        organization_id UUID NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )
    "#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (LOWER(email))"#,
    // Login sessions
    r#"
    CREATE TABLE IF NOT EXISTS user_sessions (
        token VARCHAR(128) PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )
    "#,
    // Tutor profiles
    r#"
    CREATE TABLE IF NOT EXISTS tutor_profiles (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        hourly_rate NUMERIC(10, 2) NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
        subjects TEXT[] NOT NULL DEFAULT '{}',
        bio TEXT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT non_negative_rate CHECK (hourly_rate IS NULL OR hourly_rate >= 0)
    )
    "#,
    // Weekly availability
    r#"
    CREATE TABLE IF NOT EXISTS availability_slots (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tutor_id UUID NOT NULL REFERENCES tutor_profiles(id) ON DELETE CASCADE,
        day_of_week SMALLINT NOT NULL,
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
        CONSTRAINT valid_time_range CHECK (end_time > start_time)
    )
    "#,
    // Bookings
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tutor_id UUID NOT NULL,
        requester_id UUID NOT NULL,
        account_id UUID NOT NULL,
        subject VARCHAR(255) NOT NULL,
        scheduled_at TIMESTAMP WITH TIME ZONE NOT NULL,
        duration_hours NUMERIC(6, 2) NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'REQUESTED',
        cost_credits NUMERIC(12, 2) NOT NULL,
        tutor_earnings NUMERIC(14, 4) NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        resolved_at TIMESTAMP WITH TIME ZONE NULL,
        CONSTRAINT positive_duration CHECK (duration_hours > 0)
    )
    "#,
    // Credit balances of paying accounts
    r#"
    CREATE TABLE IF NOT EXISTS credit_accounts (
        owner_id UUID PRIMARY KEY,
        balance NUMERIC(12, 2) NOT NULL DEFAULT 0,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT non_negative_balance CHECK (balance >= 0)
    )
    "#,
    // Accumulated tutor earnings
    r#"
    CREATE TABLE IF NOT EXISTS tutor_payouts (
        tutor_id UUID PRIMARY KEY,
        earned NUMERIC(14, 4) NOT NULL DEFAULT 0,
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ledger_entries (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        owner_id UUID NOT NULL,
        booking_id UUID NULL REFERENCES bookings(id) ON DELETE SET NULL,
        kind VARCHAR(16) NOT NULL,
        amount NUMERIC(14, 4) NOT NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )
    "#,
    // Bookings and payouts are ledger history and survive deletion of the
    // tutor's profile. Older databases still carry cascading keys.
    r#"ALTER TABLE bookings DROP CONSTRAINT IF EXISTS bookings_tutor_id_fkey"#,
    r#"ALTER TABLE tutor_payouts DROP CONSTRAINT IF EXISTS tutor_payouts_tutor_id_fkey"#,
    // Indexes
    r#"CREATE INDEX IF NOT EXISTS idx_user_sessions_user_id ON user_sessions(user_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_availability_slots_tutor_id ON availability_slots(tutor_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_tutor_profiles_status ON tutor_profiles(status)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_bookings_tutor_id ON bookings(tutor_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_bookings_requester_id ON bookings(requester_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_ledger_entries_owner_id ON ledger_entries(owner_id)"#,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
