use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::DomainError, pricing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TutorStatus {
    Pending,
    Approved,
    Rejected,
}

impl TutorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorStatus::Pending => "PENDING",
            TutorStatus::Approved => "APPROVED",
            TutorStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TutorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TutorStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TutorStatus::Pending),
            "APPROVED" => Ok(TutorStatus::Approved),
            "REJECTED" => Ok(TutorStatus::Rejected),
            other => Err(DomainError::Validation(format!(
                "Unknown tutor status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Hourly rate in currency units; `None` means the platform default applies.
    pub hourly_rate: Option<Decimal>,
    pub status: TutorStatus,
    pub subjects: Vec<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TutorProfile {
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects
            .iter()
            .any(|s| s.eq_ignore_ascii_case(subject.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTutorProfileRequest {
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub bio: Option<String>,
}

impl SaveTutorProfileRequest {
    /// Checks the rate and returns the subjects trimmed and de-duplicated.
    pub fn validate(&self) -> Result<Vec<String>, DomainError> {
        if let Some(rate) = self.hourly_rate {
            if rate < Decimal::ZERO {
                return Err(DomainError::Validation(
                    "Hourly rate must not be negative".to_string(),
                ));
            }
            if rate > pricing::MAX_HOURLY_RATE {
                return Err(DomainError::Validation(format!(
                    "Hourly rate must not exceed {}",
                    pricing::MAX_HOURLY_RATE
                )));
            }
            if rate.scale() > 2 {
                return Err(DomainError::Validation(
                    "Hourly rate supports at most two decimal places".to_string(),
                ));
            }
        }

        let mut subjects: Vec<String> = Vec::with_capacity(self.subjects.len());
        for subject in &self.subjects {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(DomainError::Validation(
                    "Subjects must not be empty".to_string(),
                ));
            }
            if !subjects.iter().any(|s| s.eq_ignore_ascii_case(subject)) {
                subjects.push(subject.to_string());
            }
        }
        Ok(subjects)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTutorStatusRequest {
    pub status: TutorStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorSearchQuery {
    pub subject: Option<String>,
}
