use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEntryKind {
    /// Credits taken from a paying account for a confirmed booking.
    Debit,
    /// Currency units owed to a tutor for a confirmed booking.
    Earning,
    TopUp,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryKind::Debit => "DEBIT",
            LedgerEntryKind::Earning => "EARNING",
            LedgerEntryKind::TopUp => "TOP_UP",
        }
    }
}

impl fmt::Display for LedgerEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerEntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBIT" => Ok(LedgerEntryKind::Debit),
            "EARNING" => Ok(LedgerEntryKind::Earning),
            "TOP_UP" => Ok(LedgerEntryKind::TopUp),
            other => Err(DomainError::Validation(format!(
                "Unknown ledger entry kind: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    /// Paying account for debits and top-ups, tutor profile for earnings.
    pub owner_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCreditsRequest {
    pub account_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account_id: Uuid,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsResponse {
    pub tutor_id: Uuid,
    pub earnings: Decimal,
}
