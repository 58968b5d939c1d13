//! Parking fee policy.
//!
//! Pricing is isolated behind [`FeePolicy`] so the lifecycle engine never
//! depends on how a fee is derived from a duration.

use std::fmt;

/// Fee amount in whole currency units.
pub type Fee = i64;

/// Flat fee charged per completed session unless configured otherwise.
pub const DEFAULT_FLAT_FEE: Fee = 20;

/// Pure mapping from a session's duration to the fee charged for it.
pub trait FeePolicy: Send + Sync + fmt::Debug {
    /// Computes the fee for a session that lasted `duration_minutes`.
    fn compute_fee(&self, duration_minutes: i64) -> Fee;
}

/// Charges the same amount for every completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFee {
    amount: Fee,
}

impl FlatFee {
    /// Creates a flat-fee policy charging `amount` per session.
    #[must_use]
    pub const fn new(amount: Fee) -> Self {
        Self { amount }
    }

    /// Returns the per-session amount.
    #[must_use]
    pub const fn amount(&self) -> Fee {
        self.amount
    }
}

impl Default for FlatFee {
    fn default() -> Self {
        Self::new(DEFAULT_FLAT_FEE)
    }
}

impl FeePolicy for FlatFee {
    fn compute_fee(&self, _duration_minutes: i64) -> Fee {
        self.amount
    }
}

/// Computes the fee for `duration_minutes` under the default flat policy.
#[must_use]
pub fn compute_fee(duration_minutes: i64) -> Fee {
    FlatFee::default().compute_fee(duration_minutes)
}
