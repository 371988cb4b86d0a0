//! Persistence contract for the marketplace.
//!
//! Each method is one atomic unit against storage. In particular
//! [`Store::replace_availability`] and [`Store::resolve_booking`] must either
//! apply completely or not at all, and `resolve_booking` must only move a
//! booking that is still `REQUESTED` at the moment of the write.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    errors::DomainResult,
    models::{
        availability::{AvailabilitySlot, NewAvailabilitySlot},
        booking::{Booking, BookingFilter, NewBooking, Resolution, ResolveOutcome},
        identity::{Identity, NewUser, User},
        ledger::LedgerEntry,
        tutor::{TutorProfile, TutorStatus},
    },
};

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Users and sessions

    async fn create_user(&self, user: NewUser) -> DomainResult<User>;

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Removes the user together with their sessions, tutor profile and slots.
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Resolves a session token that has not expired at `now`.
    async fn identity_for_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Identity>>;

    async fn delete_session(&self, token: &str) -> DomainResult<()>;

    // Tutor profiles

    /// Inserts the profile or updates the existing row with the same id.
    async fn save_tutor_profile(&self, profile: TutorProfile) -> DomainResult<TutorProfile>;

    async fn get_tutor_profile(&self, id: Uuid) -> DomainResult<Option<TutorProfile>>;

    async fn get_tutor_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Option<TutorProfile>>;

    async fn set_tutor_status(
        &self,
        id: Uuid,
        status: TutorStatus,
    ) -> DomainResult<Option<TutorProfile>>;

    /// Approved tutors, optionally restricted to one subject.
    async fn search_tutors(&self, subject: Option<String>) -> DomainResult<Vec<TutorProfile>>;

    // Availability

    /// Deletes every slot of the tutor and inserts `slots`, atomically.
    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        slots: &[NewAvailabilitySlot],
    ) -> DomainResult<Vec<AvailabilitySlot>>;

    /// Slots ordered by day of week, then start time.
    async fn get_availability(&self, tutor_id: Uuid) -> DomainResult<Vec<AvailabilitySlot>>;

    // Bookings

    async fn create_booking(&self, booking: NewBooking) -> DomainResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Newest first.
    async fn list_bookings(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>>;

    /// Moves a `REQUESTED` booking to its terminal state. Confirmation also
    /// debits the paying account and credits the tutor in the same unit.
    async fn resolve_booking(
        &self,
        id: Uuid,
        resolution: Resolution,
        at: DateTime<Utc>,
    ) -> DomainResult<ResolveOutcome>;

    // Ledger

    async fn get_balance(&self, account_id: Uuid) -> DomainResult<Decimal>;

    async fn get_earnings(&self, tutor_id: Uuid) -> DomainResult<Decimal>;

    /// Adds credits to an account and returns the new balance.
    async fn add_credits(&self, account_id: Uuid, amount: Decimal) -> DomainResult<Decimal>;

    /// Entries owned by any of `owner_ids`, newest first.
    async fn list_ledger_entries(&self, owner_ids: Vec<Uuid>) -> DomainResult<Vec<LedgerEntry>>;
}
