//! Amortization schedule projection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::payment::monthly_payment;
use super::terms::LoanTerms;
use crate::domain::shared::Money;

/// Residue below which the scheduled final installment retires the balance.
///
/// Decimal division leaves a remainder in the 28th digit; without this the
/// final month of a full-term schedule would end a hair above zero.
const SETTLEMENT_TOLERANCE: Decimal = dec!(0.01);

/// One month of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmortizationRow {
    /// Month number, starting at 1.
    pub month: u32,
    /// Interest accrued on the opening balance.
    pub interest: Money,
    /// Principal retired by this month's payment.
    pub principal: Money,
    /// Balance after the payment. Never negative.
    pub ending_balance: Money,
}

/// A (possibly truncated) amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmortizationProjection {
    /// Fixed monthly payment used for every row.
    pub monthly_payment: Money,
    /// Month-by-month rows, `1..=horizon`.
    pub rows: Vec<AmortizationRow>,
    /// Sum of the principal column.
    pub total_principal_paid: Money,
    /// Sum of the interest column.
    pub total_interest_paid: Money,
}

impl AmortizationProjection {
    /// Balance after the last projected month (the principal if no rows).
    #[must_use]
    pub fn final_balance(&self, terms: &LoanTerms) -> Money {
        self.rows
            .last()
            .map_or(terms.principal(), |row| row.ending_balance)
    }

    /// Number of projected months.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the horizon was zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project the schedule for `horizon_months` months.
///
/// The horizon may be shorter than, equal to, or longer than the term. Past
/// payoff the balance stays at zero and rows carry no principal.
#[must_use]
pub fn project_amortization(terms: &LoanTerms, horizon_months: u32) -> AmortizationProjection {
    let payment = monthly_payment(terms);
    let rate = terms.monthly_rate();
    let final_month = terms.payment_count();

    let mut balance = terms.principal();
    let mut rows = Vec::with_capacity(horizon_months as usize);
    let mut total_principal = Money::ZERO;
    let mut total_interest = Money::ZERO;

    for month in 1..=horizon_months {
        let interest = balance * rate;
        // A payment can never retire more than what is still owed.
        let mut principal = (payment - interest).floor_at_zero().min(balance);

        if month == final_month && (balance - principal).amount() < SETTLEMENT_TOLERANCE {
            principal = balance;
        }

        let ending = (balance - principal).floor_at_zero();
        total_principal = total_principal + principal;
        total_interest = total_interest + interest;

        rows.push(AmortizationRow {
            month,
            interest,
            principal,
            ending_balance: ending,
        });
        balance = ending;
    }

    AmortizationProjection {
        monthly_payment: payment,
        rows,
        total_principal_paid: total_principal,
        total_interest_paid: total_interest,
    }
}
