use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// A recurring weekly window during which a tutor can be booked.
///
/// Times are UTC wall-clock times. `day_of_week` counts from Sunday (0) to
/// Saturday (6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub day_of_week: i16,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl AvailabilitySlot {
    /// Whether `[start, end)` on `day_of_week` lies completely inside this slot.
    pub fn covers(&self, day_of_week: i16, start: NaiveTime, end: NaiveTime) -> bool {
        self.day_of_week == day_of_week && self.start_time <= start && end <= self.end_time
    }
}

/// A validated slot ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAvailabilitySlot {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlotRequest {
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilitySlotRequest {
    pub fn validate(&self) -> Result<NewAvailabilitySlot, DomainError> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(DomainError::Validation(format!(
                "day_of_week must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }
        let start_time = parse_hhmm(&self.start_time)?;
        let end_time = parse_hhmm(&self.end_time)?;
        if start_time >= end_time {
            return Err(DomainError::Validation(format!(
                "start_time {} must be before end_time {}",
                self.start_time, self.end_time
            )));
        }
        Ok(NewAvailabilitySlot {
            day_of_week: self.day_of_week,
            start_time,
            end_time,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAvailabilityRequest {
    #[serde(default)]
    pub slots: Vec<AvailabilitySlotRequest>,
}

impl SaveAvailabilityRequest {
    /// Validates every slot; nothing is returned unless all of them are valid.
    pub fn validate(&self) -> Result<Vec<NewAvailabilitySlot>, DomainError> {
        self.slots.iter().map(AvailabilitySlotRequest::validate).collect()
    }
}

/// Parses a strict 24h `HH:MM` time of day.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, DomainError> {
    let invalid = || DomainError::Validation(format!("Invalid time '{}', expected HH:MM", value));
    if value.len() != 5 {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())
}

/// Serializes a `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02}:{:02}", time.hour(), time.minute()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_hhmm(&value).map_err(serde::de::Error::custom)
    }
}
