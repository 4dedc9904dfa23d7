//! Mortgage Engine Property Tests
//!
//! Invariants of the payment, amortization, closing cost and budget
//! calculators over generated inputs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use purchase_desk::domain::mortgage::{
    BudgetClassification, HousingCosts, RentDirection, cash_needed_at_closing, compare_to_rent,
};
use purchase_desk::{
    AnnualRate, LoanTerms, Money, estimate_closing_costs, evaluate_budget, monthly_payment,
    project_amortization,
};

fn loan_terms() -> impl Strategy<Value = LoanTerms> {
    (1_000i64..5_000_000, 0u32..=1_500, 1u32..=40).prop_map(|(principal, rate_bp, years)| {
        LoanTerms::new(
            Money::from_units(principal),
            AnnualRate::from_percent(Decimal::new(i64::from(rate_bp), 2)),
            years,
        )
        .unwrap()
    })
}

fn classification_rank(classification: BudgetClassification) -> u8 {
    match classification {
        BudgetClassification::WithinComfort => 0,
        BudgetClassification::SlightlyHigh => 1,
        BudgetClassification::AboveComfort => 2,
    }
}

proptest! {
    #[test]
    fn payments_cover_principal(terms in loan_terms()) {
        let payment = monthly_payment(&terms);
        let total = payment * Decimal::from(terms.payment_count());
        // Allow for the rounding residue of a zero-rate division.
        prop_assert!(total.amount() >= terms.principal().amount() - dec!(0.01));
    }

    #[test]
    fn zero_rate_payment_is_straight_line(cents in 0i64..100_000_000_000, years in 1u32..=50) {
        let principal = Money::from_cents(cents);
        let terms = LoanTerms::new(principal, AnnualRate::ZERO, years).unwrap();
        let expected = principal / Decimal::from(years * 12);
        prop_assert_eq!(monthly_payment(&terms), expected);
    }

    #[test]
    fn balances_never_increase_or_go_negative(terms in loan_terms(), horizon in 1u32..=480) {
        let projection = project_amortization(&terms, horizon);
        prop_assert_eq!(projection.len(), horizon as usize);

        let mut previous = terms.principal();
        for row in &projection.rows {
            prop_assert!(row.ending_balance <= previous);
            prop_assert!(!row.ending_balance.is_negative());
            prop_assert!(!row.principal.is_negative());
            previous = row.ending_balance;
        }
    }

    #[test]
    fn full_term_retires_the_loan(terms in loan_terms()) {
        let projection = project_amortization(&terms, terms.payment_count());
        prop_assert_eq!(projection.final_balance(&terms), Money::ZERO);
        let drift = (projection.total_principal_paid - terms.principal()).abs();
        prop_assert!(drift.amount() < dec!(0.01));
    }

    #[test]
    fn closing_total_stays_near_budget(price in 0i64..20_000_000) {
        let breakdown = estimate_closing_costs(Money::from_units(price));
        let residue = (breakdown.total - breakdown.base_amount).abs();
        // Five lines, each off by at most half a unit.
        prop_assert!(residue.amount() <= dec!(2.5));
        prop_assert!(breakdown.items.iter().all(|item| !item.value.is_negative()));
    }

    #[test]
    fn cash_to_close_is_never_negative(
        down in 0i64..2_000_000,
        closing in 0i64..100_000,
        seller in 0i64..500_000,
        lender in 0i64..500_000,
    ) {
        let cash = cash_needed_at_closing(
            Money::from_units(down),
            Money::from_units(closing),
            Money::from_units(seller),
            Money::from_units(lender),
        );
        prop_assert!(!cash.is_negative());
    }

    #[test]
    fn classification_is_monotonic_in_cost(
        base in 0i64..20_000,
        extra in 0i64..20_000,
        income in 1i64..50_000,
    ) {
        let costs = |pi: i64| HousingCosts {
            principal_and_interest: Money::from_units(pi),
            ..HousingCosts::default()
        };
        let lower = evaluate_budget(&costs(base), Money::from_units(income));
        let higher = evaluate_budget(&costs(base + extra), Money::from_units(income));

        prop_assert!(lower.housing_share <= higher.housing_share);
        prop_assert!(
            classification_rank(lower.classification) <= classification_rank(higher.classification)
        );
    }

    #[test]
    fn rent_direction_matches_delta(cost in 0i64..20_000, rent in 0i64..20_000) {
        let comparison = compare_to_rent(Money::from_units(cost), Money::from_units(rent));
        let expected = match cost.cmp(&rent) {
            std::cmp::Ordering::Greater => RentDirection::More,
            std::cmp::Ordering::Less => RentDirection::Less,
            std::cmp::Ordering::Equal => RentDirection::Same,
        };
        prop_assert_eq!(comparison.direction, expected);
        prop_assert_eq!(comparison.delta, Money::from_units(cost - rent));
    }
}
