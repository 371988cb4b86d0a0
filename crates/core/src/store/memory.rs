//! In-process [`Store`] backed by hash maps behind a single async mutex.
//!
//! Every method holds the lock for its whole body, which gives each call the
//! same all-or-nothing behaviour the PostgreSQL store gets from transactions.
//! Used by tests and for running the API without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::eyre;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::{
    errors::{DomainError, DomainResult},
    models::{
        availability::{AvailabilitySlot, NewAvailabilitySlot},
        booking::{Booking, BookingFilter, BookingStatus, NewBooking, Resolution, ResolveOutcome},
        identity::{Identity, NewUser, User},
        ledger::{LedgerEntry, LedgerEntryKind},
        tutor::{TutorProfile, TutorStatus},
    },
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    tutors: HashMap<Uuid, TutorProfile>,
    slots: HashMap<Uuid, Vec<AvailabilitySlot>>,
    bookings: HashMap<Uuid, Booking>,
    balances: HashMap<Uuid, Decimal>,
    earnings: HashMap<Uuid, Decimal>,
    ledger: Vec<LedgerEntry>,
    /// Number of slot inserts allowed before the next availability write fails.
    fail_after_inserts: Option<usize>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `replace_availability` call fail after inserting
    /// `inserted` slots, as a storage error would half way through a write.
    pub async fn fail_next_availability_write_after(&self, inserted: usize) {
        self.state.lock().await.fail_after_inserts = Some(inserted);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> DomainResult<User> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::Transaction(eyre!(
                "duplicate key value violates unique constraint on users.email"
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            organization_id: user.organization_id,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.users.remove(&id);
        state.sessions.retain(|_, (user_id, _)| *user_id != id);

        let profiles: Vec<Uuid> = state
            .tutors
            .values()
            .filter(|t| t.user_id == id)
            .map(|t| t.id)
            .collect();
        // Bookings and earnings outlive the profile; they are ledger history.
        for profile_id in profiles {
            state.tutors.remove(&profile_id);
            state.slots.remove(&profile_id);
        }
        Ok(())
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn identity_for_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Identity>> {
        let state = self.state.lock().await;
        let identity = state
            .sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > now)
            .and_then(|(user_id, _)| state.users.get(user_id))
            .map(User::identity);
        Ok(identity)
    }

    async fn delete_session(&self, token: &str) -> DomainResult<()> {
        self.state.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn save_tutor_profile(&self, profile: TutorProfile) -> DomainResult<TutorProfile> {
        let mut state = self.state.lock().await;
        state.tutors.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_tutor_profile(&self, id: Uuid) -> DomainResult<Option<TutorProfile>> {
        Ok(self.state.lock().await.tutors.get(&id).cloned())
    }

    async fn get_tutor_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Option<TutorProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .tutors
            .values()
            .find(|t| t.user_id == user_id)
            .cloned())
    }

    async fn set_tutor_status(
        &self,
        id: Uuid,
        status: TutorStatus,
    ) -> DomainResult<Option<TutorProfile>> {
        let mut state = self.state.lock().await;
        Ok(state.tutors.get_mut(&id).map(|profile| {
            profile.status = status;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn search_tutors(&self, subject: Option<String>) -> DomainResult<Vec<TutorProfile>> {
        let state = self.state.lock().await;
        let mut tutors: Vec<TutorProfile> = state
            .tutors
            .values()
            .filter(|t| t.status == TutorStatus::Approved)
            .filter(|t| subject.as_deref().is_none_or(|s| t.teaches(s)))
            .cloned()
            .collect();
        tutors.sort_by_key(|t| t.created_at);
        Ok(tutors)
    }

    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        slots: &[NewAvailabilitySlot],
    ) -> DomainResult<Vec<AvailabilitySlot>> {
        let mut state = self.state.lock().await;

        // Build the new set aside; the stored set is only swapped on success.
        let mut staged = Vec::with_capacity(slots.len());
        for (inserted, slot) in slots.iter().enumerate() {
            if state.fail_after_inserts.is_some_and(|limit| inserted >= limit) {
                state.fail_after_inserts = None;
                return Err(DomainError::Transaction(eyre!(
                    "failed to insert availability slot {} for tutor {}",
                    inserted,
                    tutor_id
                )));
            }
            staged.push(AvailabilitySlot {
                id: Uuid::new_v4(),
                tutor_id,
                day_of_week: slot.day_of_week,
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
        }

        state.fail_after_inserts = None;
        state.slots.insert(tutor_id, staged.clone());
        Ok(staged)
    }

    async fn get_availability(&self, tutor_id: Uuid) -> DomainResult<Vec<AvailabilitySlot>> {
        let state = self.state.lock().await;
        let mut slots = state.slots.get(&tutor_id).cloned().unwrap_or_default();
        slots.sort_by_key(|s| (s.day_of_week, s.start_time));
        Ok(slots)
    }

    async fn create_booking(&self, booking: NewBooking) -> DomainResult<Booking> {
        let mut state = self.state.lock().await;
        let booking = Booking {
            id: Uuid::new_v4(),
            tutor_id: booking.tutor_id,
            requester_id: booking.requester_id,
            account_id: booking.account_id,
            subject: booking.subject,
            scheduled_at: booking.scheduled_at,
            duration_hours: booking.duration_hours,
            status: BookingStatus::Requested,
            cost_credits: booking.cost_credits,
            tutor_earnings: booking.tutor_earnings,
            created_at: Utc::now(),
            resolved_at: None,
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.state.lock().await.bookings.get(&id).cloned())
    }

    async fn list_bookings(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| match filter {
                BookingFilter::Tutor(tutor_id) => b.tutor_id == tutor_id,
                BookingFilter::Requester(user_id) => b.requester_id == user_id,
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn resolve_booking(
        &self,
        id: Uuid,
        resolution: Resolution,
        at: DateTime<Utc>,
    ) -> DomainResult<ResolveOutcome> {
        let mut state = self.state.lock().await;

        let Some(booking) = state.bookings.get(&id).cloned() else {
            return Ok(ResolveOutcome::Missing);
        };
        if booking.status.is_terminal() {
            return Ok(ResolveOutcome::NotRequested(booking.status));
        }

        if resolution == Resolution::Confirm {
            let available = state
                .balances
                .get(&booking.account_id)
                .copied()
                .unwrap_or_default();
            if available < booking.cost_credits {
                return Ok(ResolveOutcome::InsufficientBalance {
                    required: booking.cost_credits,
                    available,
                });
            }

            state
                .balances
                .insert(booking.account_id, available - booking.cost_credits);
            *state.earnings.entry(booking.tutor_id).or_default() += booking.tutor_earnings;
            state.ledger.push(LedgerEntry {
                id: Uuid::new_v4(),
                owner_id: booking.account_id,
                booking_id: Some(booking.id),
                kind: LedgerEntryKind::Debit,
                amount: booking.cost_credits,
                created_at: at,
            });
            state.ledger.push(LedgerEntry {
                id: Uuid::new_v4(),
                owner_id: booking.tutor_id,
                booking_id: Some(booking.id),
                kind: LedgerEntryKind::Earning,
                amount: booking.tutor_earnings,
                created_at: at,
            });
        }

        let resolved = Booking {
            status: resolution.target(),
            resolved_at: Some(at),
            ..booking
        };
        state.bookings.insert(id, resolved.clone());
        Ok(ResolveOutcome::Resolved(resolved))
    }

    async fn get_balance(&self, account_id: Uuid) -> DomainResult<Decimal> {
        let state = self.state.lock().await;
        Ok(state.balances.get(&account_id).copied().unwrap_or_default())
    }

    async fn get_earnings(&self, tutor_id: Uuid) -> DomainResult<Decimal> {
        let state = self.state.lock().await;
        Ok(state.earnings.get(&tutor_id).copied().unwrap_or_default())
    }

    async fn add_credits(&self, account_id: Uuid, amount: Decimal) -> DomainResult<Decimal> {
        let mut state = self.state.lock().await;
        let balance = state.balances.entry(account_id).or_default();
        *balance += amount;
        let balance = *balance;
        state.ledger.push(LedgerEntry {
            id: Uuid::new_v4(),
            owner_id: account_id,
            booking_id: None,
            kind: LedgerEntryKind::TopUp,
            amount,
            created_at: Utc::now(),
        });
        Ok(balance)
    }

    async fn list_ledger_entries(&self, owner_ids: Vec<Uuid>) -> DomainResult<Vec<LedgerEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .ledger
            .iter()
            .rev()
            .filter(|e| owner_ids.contains(&e.owner_id))
            .cloned()
            .collect())
    }
}
