//! # Tutorly Core
//!
//! Domain types and rules for the tutoring marketplace: pricing of sessions in
//! platform credits, weekly tutor availability, the booking lifecycle and the
//! credit ledger that confirmed bookings write to.
//!
//! Persistence is abstracted behind [`store::Store`]. Operations in
//! [`services`] take the store and the caller's [`models::identity::Identity`]
//! explicitly, so the process entry point owns the storage lifecycle.

pub mod errors;
pub mod models;
pub mod pricing;
pub mod services;
pub mod store;
