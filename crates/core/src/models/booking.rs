use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Declined,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "REQUESTED",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Declined => "DECLINED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Requested)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUESTED" => Ok(BookingStatus::Requested),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "DECLINED" => Ok(BookingStatus::Declined),
            other => Err(DomainError::Validation(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub requester_id: Uuid,
    /// Credit account debited on confirmation.
    pub account_id: Uuid,
    pub subject: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_hours: Decimal,
    pub status: BookingStatus,
    /// Locked at request time.
    pub cost_credits: Decimal,
    /// Locked at request time.
    pub tutor_earnings: Decimal,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id || self.account_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub tutor_id: Uuid,
    pub requester_id: Uuid,
    pub account_id: Uuid,
    pub subject: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_hours: Decimal,
    pub cost_credits: Decimal,
    pub tutor_earnings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub tutor_id: Uuid,
    pub subject: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_hours: Option<Decimal>,
}

/// Which terminal state a booking should move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Confirm,
    Decline,
}

impl Resolution {
    pub fn target(&self) -> BookingStatus {
        match self {
            Resolution::Confirm => BookingStatus::Confirmed,
            Resolution::Decline => BookingStatus::Declined,
        }
    }
}

/// Result of a conditional booking transition as reported by a store.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(Booking),
    /// The booking had already left `REQUESTED`; carries the state observed.
    NotRequested(BookingStatus),
    InsufficientBalance { required: Decimal, available: Decimal },
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    Tutor(Uuid),
    Requester(Uuid),
}
