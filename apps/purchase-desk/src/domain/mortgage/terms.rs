//! Loan terms value object.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::domain::shared::{AnnualRate, DomainError, Money};

/// Longest loan term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 50;

/// Largest principal accepted. Keeps every intermediate product of the
/// amortization arithmetic inside the decimal range.
pub const MAX_PRINCIPAL: Money = Money::MAX_AMOUNT;

/// Terms of a fully amortizing fixed-rate loan.
///
/// `principal` is the post-down-payment balance. A `LoanTerms` value always
/// satisfies `principal >= 0`, `rate >= 0` and `term_years > 0`, so the
/// payment count is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanTerms {
    principal: Money,
    annual_rate: AnnualRate,
    term_years: u32,
}

impl LoanTerms {
    /// Create validated loan terms.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the principal is negative or
    /// above [`MAX_PRINCIPAL`], the rate is out of range, or the term is not
    /// within `1..=MAX_TERM_YEARS`.
    pub fn new(
        principal: Money,
        annual_rate: AnnualRate,
        term_years: u32,
    ) -> Result<Self, DomainError> {
        let principal = principal.ensure_non_negative("principal")?;
        if principal > MAX_PRINCIPAL {
            return Err(DomainError::invalid(
                "principal",
                format!("principal cannot exceed {MAX_PRINCIPAL}"),
            ));
        }
        let annual_rate = AnnualRate::try_from_percent(annual_rate.percent())?;
        if term_years == 0 || term_years > MAX_TERM_YEARS {
            return Err(DomainError::invalid(
                "term_years",
                format!("term must be between 1 and {MAX_TERM_YEARS} years"),
            ));
        }

        Ok(Self {
            principal,
            annual_rate,
            term_years,
        })
    }

    /// Loan balance at origination.
    #[must_use]
    pub const fn principal(&self) -> Money {
        self.principal
    }

    /// Annual nominal rate.
    #[must_use]
    pub const fn annual_rate(&self) -> AnnualRate {
        self.annual_rate
    }

    /// Term in years.
    #[must_use]
    pub const fn term_years(&self) -> u32 {
        self.term_years
    }

    /// Total number of monthly payments.
    #[must_use]
    pub const fn payment_count(&self) -> u32 {
        self.term_years * 12
    }

    /// Periodic (monthly) interest rate as a fraction.
    #[must_use]
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_rate.monthly_rate()
    }
}
