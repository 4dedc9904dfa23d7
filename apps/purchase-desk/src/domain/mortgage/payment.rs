//! Fixed monthly payment for a fully amortizing loan.

use rust_decimal::{Decimal, MathematicalOps};

use super::terms::LoanTerms;
use crate::domain::shared::Money;

/// Compute the fixed monthly principal-and-interest payment.
///
/// ```text
/// r = rate / 100 / 12,  n = years * 12
/// r == 0  ->  P / n
/// r >  0  ->  P * r * (1+r)^n / ((1+r)^n - 1)
/// ```
///
/// If `(1+r)^n` leaves the decimal range the payment converges to `P * r`
/// (interest-only), which is returned instead.
#[must_use]
pub fn monthly_payment(terms: &LoanTerms) -> Money {
    let principal = terms.principal().amount();
    let payments = Decimal::from(terms.payment_count());
    let rate = terms.monthly_rate();

    if rate.is_zero() {
        return Money::new(principal / payments);
    }

    let payment = match (Decimal::ONE + rate).checked_powu(u64::from(terms.payment_count())) {
        // 1 + r can round to exactly 1 for vanishingly small rates.
        Some(growth) if growth <= Decimal::ONE => principal / payments,
        Some(growth) => principal * rate * (growth / (growth - Decimal::ONE)),
        None => principal * rate,
    };

    Money::new(payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::AnnualRate;
    use rust_decimal_macros::dec;

    fn terms(principal: i64, rate: Decimal, years: u32) -> LoanTerms {
        LoanTerms::new(
            Money::from_units(principal),
            AnnualRate::from_percent(rate),
            years,
        )
        .unwrap()
    }

    #[test]
    fn thirty_year_at_six_and_a_quarter() {
        let payment = monthly_payment(&terms(600_000, dec!(6.25), 30));
        assert_eq!(payment.round(), Money::new(dec!(3694.30)));
    }

    #[test]
    fn one_year_at_twelve_percent() {
        let payment = monthly_payment(&terms(100_000, dec!(12), 1));
        assert_eq!(payment.round(), Money::new(dec!(8884.88)));
    }

    #[test]
    fn zero_rate_is_straight_line() {
        let t = terms(360_000, Decimal::ZERO, 30);
        assert_eq!(monthly_payment(&t), Money::from_units(1_000));
    }

    #[test]
    fn zero_principal_pays_nothing() {
        assert!(monthly_payment(&terms(0, dec!(7), 30)).is_zero());
    }

    #[test]
    fn higher_rate_means_higher_payment() {
        let low = monthly_payment(&terms(300_000, dec!(4), 30));
        let high = monthly_payment(&terms(300_000, dec!(8), 30));
        assert!(high > low);
    }

    #[test]
    fn extreme_rate_does_not_panic() {
        let payment = monthly_payment(&terms(1_000_000, dec!(100), 50));
        assert!(payment.is_positive());
    }
}
