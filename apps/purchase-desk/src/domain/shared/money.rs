//! Money value object for currency amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::domain::shared::DomainError;

/// A monetary amount in the buyer's currency.
///
/// Represented as a Decimal for precise financial calculations. Internal
/// precision is kept through the amortization arithmetic; rounding only
/// happens where a calculation explicitly asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount accepted for any input field. Sums and products of a
    /// scenario's inputs stay far inside the decimal range below it.
    pub const MAX_AMOUNT: Self = Self(dec!(1_000_000_000_000));

    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a Money value from cents (integer).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Get the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp negative amounts to zero.
    #[must_use]
    pub fn floor_at_zero(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Round to cents, half away from zero.
    #[must_use]
    pub fn round(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Round to whole currency units, half away from zero.
    #[must_use]
    pub fn round_to_unit(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Reject negative amounts for a named input field.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the amount is negative.
    pub fn ensure_non_negative(self, field: &str) -> Result<Self, DomainError> {
        if self.is_negative() {
            return Err(DomainError::invalid(field, "amount cannot be negative"));
        }
        Ok(self)
    }

    /// Reject negative amounts and amounts above [`Money::MAX_AMOUNT`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the amount is out of range.
    pub fn ensure_input_range(self, field: &str) -> Result<Self, DomainError> {
        let amount = self.ensure_non_negative(field)?;
        if amount > Self::MAX_AMOUNT {
            return Err(DomainError::invalid(
                field,
                format!("amount cannot exceed {}", Self::MAX_AMOUNT),
            ));
        }
        Ok(amount)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.round().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_new_and_display() {
        let m = Money::new(dec!(150.5));
        assert_eq!(format!("{m}"), "$150.50");
    }

    #[test]
    fn money_from_cents() {
        let m = Money::from_cents(15050);
        assert_eq!(m.amount(), dec!(150.50));
    }

    #[test]
    fn money_zero() {
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn money_floor_at_zero() {
        assert_eq!(Money::from_units(-5).floor_at_zero(), Money::ZERO);
        assert_eq!(Money::from_units(5).floor_at_zero(), Money::from_units(5));
    }

    #[test]
    fn money_round_half_away_from_zero() {
        assert_eq!(Money::new(dec!(2.5)).round_to_unit(), Money::from_units(3));
        assert_eq!(Money::new(dec!(3.5)).round_to_unit(), Money::from_units(4));
        assert_eq!(Money::new(dec!(-2.5)).round_to_unit(), Money::from_units(-3));
        assert_eq!(Money::new(dec!(1.005)).round(), Money::new(dec!(1.01)));
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_units(100);
        let b = Money::from_units(50);

        assert_eq!(a + b, Money::from_units(150));
        assert_eq!(a - b, Money::from_units(50));
        assert_eq!(-a, Money::from_units(-100));
        assert_eq!(a * dec!(0.25), Money::from_units(25));
        assert_eq!(a / dec!(4), Money::from_units(25));
    }

    #[test]
    fn money_sum() {
        let items = [Money::from_units(1), Money::from_units(2), Money::from_units(3)];
        let total: Money = items.iter().sum();
        assert_eq!(total, Money::from_units(6));
    }

    #[test]
    fn money_ensure_non_negative() {
        assert!(Money::from_units(-1).ensure_non_negative("price").is_err());
        assert!(Money::ZERO.ensure_non_negative("price").is_ok());
    }

    #[test]
    fn money_input_range() {
        assert!(Money::MAX_AMOUNT.ensure_input_range("price").is_ok());
        assert!(matches!(
            Money::new(Decimal::MAX).ensure_input_range("price"),
            Err(DomainError::InvalidValue { .. })
        ));
        assert!(Money::from_units(-1).ensure_input_range("price").is_err());
    }

    #[test]
    fn money_serde_transparent() {
        let m = Money::new(dec!(12.34));
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"12.34\"");
        let back: Money = serde_json::from_str("12.34").unwrap();
        assert_eq!(back, m);
    }
}
