//! PostgreSQL implementation of the core [`Store`] contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rust_decimal::Decimal;
use tracing::debug;
use tutorly_core::{
    errors::{DomainError, DomainResult},
    models::{
        availability::{AvailabilitySlot, NewAvailabilitySlot},
        booking::{Booking, BookingFilter, NewBooking, Resolution, ResolveOutcome},
        identity::{Identity, NewUser, User},
        ledger::{LedgerEntry, LedgerEntryKind},
        tutor::{TutorProfile, TutorStatus},
    },
    store::Store,
};
use uuid::Uuid;

use crate::{DbPool, repositories};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn confirm_booking(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> eyre::Result<ResolveOutcome> {
        let mut tx = self.pool.begin().await?;

        let Some(row) =
            repositories::booking::transition_requested_booking(&mut tx, id, "CONFIRMED", at)
                .await?
        else {
            let status = repositories::booking::get_booking_status(&mut tx, id).await?;
            tx.rollback().await?;
            return Ok(match status {
                Some(status) => ResolveOutcome::NotRequested(status.parse()?),
                None => ResolveOutcome::Missing,
            });
        };
        let booking = Booking::try_from(row)?;

        repositories::ledger::ensure_credit_account(&mut tx, booking.account_id).await?;
        let available = repositories::ledger::lock_balance(&mut tx, booking.account_id).await?;
        if available < booking.cost_credits {
            tx.rollback().await?;
            return Ok(ResolveOutcome::InsufficientBalance {
                required: booking.cost_credits,
                available,
            });
        }

        repositories::ledger::adjust_balance(&mut tx, booking.account_id, -booking.cost_credits)
            .await?;
        repositories::ledger::add_tutor_earnings(&mut tx, booking.tutor_id, booking.tutor_earnings)
            .await?;
        repositories::ledger::create_ledger_entry(
            &mut tx,
            booking.account_id,
            Some(booking.id),
            LedgerEntryKind::Debit.as_str(),
            booking.cost_credits,
        )
        .await?;
        repositories::ledger::create_ledger_entry(
            &mut tx,
            booking.tutor_id,
            Some(booking.id),
            LedgerEntryKind::Earning.as_str(),
            booking.tutor_earnings,
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit booking confirmation")?;
        Ok(ResolveOutcome::Resolved(booking))
    }

    async fn decline_booking(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> eyre::Result<ResolveOutcome> {
        let mut tx = self.pool.begin().await?;

        let outcome =
            match repositories::booking::transition_requested_booking(&mut tx, id, "DECLINED", at)
                .await?
            {
                Some(row) => ResolveOutcome::Resolved(Booking::try_from(row)?),
                None => match repositories::booking::get_booking_status(&mut tx, id).await? {
                    Some(status) => ResolveOutcome::NotRequested(status.parse()?),
                    None => ResolveOutcome::Missing,
                },
            };

        tx.commit().await?;
        Ok(outcome)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> DomainResult<User> {
        let row = repositories::user::create_user(
            &self.pool,
            &user.email,
            &user.name,
            &user.password_hash,
            user.role.as_str(),
            user.organization_id,
        )
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = repositories::user::get_user_by_email(&self.pool, email).await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        repositories::user::delete_user(&self.pool, id).await?;
        Ok(())
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        repositories::user::create_session(&self.pool, token, user_id, expires_at).await?;
        Ok(())
    }

    async fn identity_for_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Identity>> {
        let row = repositories::user::get_user_by_session(&self.pool, token, now).await?;
        let user = row.map(User::try_from).transpose()?;
        Ok(user.as_ref().map(User::identity))
    }

    async fn delete_session(&self, token: &str) -> DomainResult<()> {
        repositories::user::delete_session(&self.pool, token).await?;
        Ok(())
    }

    async fn save_tutor_profile(&self, profile: TutorProfile) -> DomainResult<TutorProfile> {
        let row = repositories::tutor::upsert_tutor_profile(
            &self.pool,
            profile.id,
            profile.user_id,
            profile.hourly_rate,
            profile.status.as_str(),
            &profile.subjects,
            profile.bio.as_deref(),
            profile.created_at,
            profile.updated_at,
        )
        .await?;
        Ok(TutorProfile::try_from(row)?)
    }

    async fn get_tutor_profile(&self, id: Uuid) -> DomainResult<Option<TutorProfile>> {
        let row = repositories::tutor::get_tutor_profile_by_id(&self.pool, id).await?;
        Ok(row.map(TutorProfile::try_from).transpose()?)
    }

    async fn get_tutor_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Option<TutorProfile>> {
        let row = repositories::tutor::get_tutor_profile_by_user_id(&self.pool, user_id).await?;
        Ok(row.map(TutorProfile::try_from).transpose()?)
    }

    async fn set_tutor_status(
        &self,
        id: Uuid,
        status: TutorStatus,
    ) -> DomainResult<Option<TutorProfile>> {
        let row = repositories::tutor::update_tutor_status(&self.pool, id, status.as_str()).await?;
        Ok(row.map(TutorProfile::try_from).transpose()?)
    }

    async fn search_tutors(&self, subject: Option<String>) -> DomainResult<Vec<TutorProfile>> {
        let rows =
            repositories::tutor::search_approved_tutors(&self.pool, subject.as_deref()).await?;
        rows.into_iter()
            .map(|row| TutorProfile::try_from(row).map_err(DomainError::Transaction))
            .collect()
    }

    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        slots: &[NewAvailabilitySlot],
    ) -> DomainResult<Vec<AvailabilitySlot>> {
        // Dropping `tx` on any error rolls back, leaving the previous set.
        let mut tx = self.pool.begin().await.map_err(eyre::Report::from)?;

        let removed =
            repositories::availability::delete_availability_slots_by_tutor_id(&mut tx, tutor_id)
                .await?;

        let mut saved = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = repositories::availability::create_availability_slot(
                &mut tx,
                tutor_id,
                slot.day_of_week,
                slot.start_time,
                slot.end_time,
            )
            .await?;
            saved.push(AvailabilitySlot::from(row));
        }

        tx.commit()
            .await
            .wrap_err("Failed to commit availability replacement")?;
        debug!(%tutor_id, removed, inserted = saved.len(), "availability slots replaced");

        saved.sort_by_key(|s| (s.day_of_week, s.start_time));
        Ok(saved)
    }

    async fn get_availability(&self, tutor_id: Uuid) -> DomainResult<Vec<AvailabilitySlot>> {
        let rows =
            repositories::availability::get_availability_slots_by_tutor_id(&self.pool, tutor_id)
                .await?;
        Ok(rows.into_iter().map(AvailabilitySlot::from).collect())
    }

    async fn create_booking(&self, booking: NewBooking) -> DomainResult<Booking> {
        let row = repositories::booking::create_booking(&self.pool, &booking).await?;
        Ok(Booking::try_from(row)?)
    }

    async fn get_booking(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let row = repositories::booking::get_booking_by_id(&self.pool, id).await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn list_bookings(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>> {
        let rows = match filter {
            BookingFilter::Tutor(tutor_id) => {
                repositories::booking::get_bookings_by_tutor_id(&self.pool, tutor_id).await?
            }
            BookingFilter::Requester(requester_id) => {
                repositories::booking::get_bookings_by_requester_id(&self.pool, requester_id)
                    .await?
            }
        };
        rows.into_iter()
            .map(|row| Booking::try_from(row).map_err(DomainError::Transaction))
            .collect()
    }

    async fn resolve_booking(
        &self,
        id: Uuid,
        resolution: Resolution,
        at: DateTime<Utc>,
    ) -> DomainResult<ResolveOutcome> {
        let outcome = match resolution {
            Resolution::Confirm => self.confirm_booking(id, at).await?,
            Resolution::Decline => self.decline_booking(id, at).await?,
        };
        Ok(outcome)
    }

    async fn get_balance(&self, account_id: Uuid) -> DomainResult<Decimal> {
        Ok(repositories::ledger::get_balance(&self.pool, account_id).await?)
    }

    async fn get_earnings(&self, tutor_id: Uuid) -> DomainResult<Decimal> {
        Ok(repositories::ledger::get_tutor_earnings(&self.pool, tutor_id).await?)
    }

    async fn add_credits(&self, account_id: Uuid, amount: Decimal) -> DomainResult<Decimal> {
        let mut tx = self.pool.begin().await.map_err(eyre::Report::from)?;

        repositories::ledger::ensure_credit_account(&mut tx, account_id).await?;
        let balance = repositories::ledger::adjust_balance(&mut tx, account_id, amount).await?;
        repositories::ledger::create_ledger_entry(
            &mut tx,
            account_id,
            None,
            LedgerEntryKind::TopUp.as_str(),
            amount,
        )
        .await?;

        tx.commit().await.map_err(eyre::Report::from)?;
        Ok(balance)
    }

    async fn list_ledger_entries(&self, owner_ids: Vec<Uuid>) -> DomainResult<Vec<LedgerEntry>> {
        let rows =
            repositories::ledger::get_ledger_entries_by_owner_ids(&self.pool, &owner_ids).await?;
        rows.into_iter()
            .map(|row| LedgerEntry::try_from(row).map_err(DomainError::Transaction))
            .collect()
    }
}
