//! Interest rate value object.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Highest annual rate accepted by the validating constructor, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(100);

/// An annual nominal interest rate expressed in percent (`6.25` = 6.25 %).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualRate(Decimal);

impl AnnualRate {
    /// Zero interest.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a rate from a percentage without validation.
    #[must_use]
    pub const fn from_percent(percent: Decimal) -> Self {
        Self(percent)
    }

    /// Create a rate from a percentage, rejecting negative or absurd values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the rate is negative or above
    /// [`MAX_ANNUAL_RATE_PERCENT`].
    pub fn try_from_percent(percent: Decimal) -> Result<Self, DomainError> {
        if percent < Decimal::ZERO {
            return Err(DomainError::invalid(
                "annual_rate_percent",
                "rate cannot be negative",
            ));
        }
        if percent > MAX_ANNUAL_RATE_PERCENT {
            return Err(DomainError::invalid(
                "annual_rate_percent",
                format!("rate cannot exceed {MAX_ANNUAL_RATE_PERCENT}%"),
            ));
        }
        Ok(Self(percent))
    }

    /// The rate in percent.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Periodic rate for monthly compounding: `percent / 100 / 12`.
    #[must_use]
    pub fn monthly_rate(&self) -> Decimal {
        self.0 / dec!(100) / dec!(12)
    }

    /// Returns true for a zero-interest loan.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for AnnualRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
