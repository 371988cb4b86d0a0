use chrono::{DateTime, NaiveTime, Utc};
use eyre::Report;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorly_core::models::{
    availability::AvailabilitySlot,
    booking::Booking,
    identity::User,
    ledger::LedgerEntry,
    tutor::TutorProfile,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hourly_rate: Option<Decimal>,
    pub status: String,
    pub subjects: Vec<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilitySlot {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub requester_id: Uuid,
    pub account_id: Uuid,
    pub subject: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_hours: Decimal,
    pub status: String,
    pub cost_credits: Decimal,
    pub tutor_earnings: Decimal,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLedgerEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub kind: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = Report;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            organization_id: row.organization_id,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbTutorProfile> for TutorProfile {
    type Error = Report;

    fn try_from(row: DbTutorProfile) -> Result<Self, Self::Error> {
        Ok(TutorProfile {
            id: row.id,
            user_id: row.user_id,
            hourly_rate: row.hourly_rate,
            status: row.status.parse()?,
            subjects: row.subjects,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbAvailabilitySlot> for AvailabilitySlot {
    fn from(row: DbAvailabilitySlot) -> Self {
        AvailabilitySlot {
            id: row.id,
            tutor_id: row.tutor_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            tutor_id: row.tutor_id,
            requester_id: row.requester_id,
            account_id: row.account_id,
            subject: row.subject,
            scheduled_at: row.scheduled_at,
            duration_hours: row.duration_hours,
            status: row.status.parse()?,
            cost_credits: row.cost_credits,
            tutor_earnings: row.tutor_earnings,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

impl TryFrom<DbLedgerEntry> for LedgerEntry {
    type Error = Report;

    fn try_from(row: DbLedgerEntry) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            id: row.id,
            owner_id: row.owner_id,
            booking_id: row.booking_id,
            kind: row.kind.parse()?,
            amount: row.amount,
            created_at: row.created_at,
        })
    }
}
