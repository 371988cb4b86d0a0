//! # Pricing Rules
//!
//! Converts a tutor's hourly rate (in currency units) into what a session costs
//! the requester in platform credits, and into what the tutor earns.
//!
//! The requester pays the rate plus the platform fee, converted to credits and
//! rounded up to the cent. The tutor earns the plain rate. The platform margin
//! is the spread between the two; nothing is deducted from the tutor.
//!
//! When a tutor has not set a rate, a session costs [`DEFAULT_CREDITS_PER_HOUR`]
//! and the tutor earns that credit's value with the fee taken back out, rounded
//! down to the cent. Both defaults derive from the same constant.
//!
//! Rates up to [`MAX_HOURLY_RATE`] and durations up to [`MAX_DURATION_HOURS`]
//! are checked before they reach these functions, which keeps every product
//! well inside `Decimal` range.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Platform fee added on top of the tutor's rate.
pub const FEE_PERCENT: Decimal = dec!(0.20);

/// Currency units one credit is worth.
pub const CREDIT_VALUE: Decimal = dec!(25);

/// Credits charged per hour when the tutor has no rate.
pub const DEFAULT_CREDITS_PER_HOUR: Decimal = dec!(1);

/// Session length used when a request does not specify one.
pub const DEFAULT_DURATION_HOURS: Decimal = dec!(1);

/// Longest session that can be requested.
pub const MAX_DURATION_HOURS: Decimal = dec!(24);

/// Highest hourly rate a profile may carry, the largest `NUMERIC(10, 2)`.
pub const MAX_HOURLY_RATE: Decimal = dec!(99999999.99);

const CENTS: u32 = 2;

/// Credits charged for a session, rounded up to two decimal places.
pub fn session_cost(hourly_rate: Option<Decimal>, duration_hours: Decimal) -> Decimal {
    let exact = match hourly_rate {
        Some(rate) => rate * (Decimal::ONE + FEE_PERCENT) / CREDIT_VALUE * duration_hours,
        None => DEFAULT_CREDITS_PER_HOUR * duration_hours,
    };
    exact.round_dp_with_strategy(CENTS, RoundingStrategy::ToPositiveInfinity)
}

/// Currency units a tutor earns for a session.
pub fn tutor_earnings(hourly_rate: Option<Decimal>, duration_hours: Decimal) -> Decimal {
    match hourly_rate {
        Some(rate) => rate * duration_hours,
        None => (default_hourly_earnings() * duration_hours)
            .round_dp_with_strategy(CENTS, RoundingStrategy::ToNegativeInfinity),
    }
}

/// What a tutor without a rate earns per hour: one default credit, fee removed.
pub fn default_hourly_earnings() -> Decimal {
    DEFAULT_CREDITS_PER_HOUR * CREDIT_VALUE / (Decimal::ONE + FEE_PERCENT)
}
