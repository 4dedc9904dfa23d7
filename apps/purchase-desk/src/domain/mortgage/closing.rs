//! Closing cost estimation and cash-to-close.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::domain::shared::Money;

/// Share of the home price budgeted for one-time closing costs.
pub const CLOSING_COST_RATE: Decimal = dec!(0.025);

/// Closing cost categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingCostCategory {
    /// Origination, underwriting, appraisal.
    LenderFees,
    /// Title insurance, escrow and attorney fees.
    TitleAndLegal,
    /// Prepaid property tax and homeowner's insurance.
    PrepaidTaxesAndInsurance,
    /// Transfer taxes and recording fees.
    GovernmentAndRecording,
    /// Everything else.
    Other,
}

impl ClosingCostCategory {
    /// All categories in breakdown order.
    pub const ALL: [Self; 5] = [
        Self::LenderFees,
        Self::TitleAndLegal,
        Self::PrepaidTaxesAndInsurance,
        Self::GovernmentAndRecording,
        Self::Other,
    ];

    /// Allocation weight of this category within the closing cost base.
    #[must_use]
    pub const fn weight(self) -> Decimal {
        match self {
            Self::LenderFees => dec!(0.28),
            Self::TitleAndLegal => dec!(0.24),
            Self::PrepaidTaxesAndInsurance => dec!(0.18),
            Self::GovernmentAndRecording => dec!(0.22),
            Self::Other => dec!(0.08),
        }
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LenderFees => "Lender fees",
            Self::TitleAndLegal => "Title & legal",
            Self::PrepaidTaxesAndInsurance => "Prepaid taxes & insurance",
            Self::GovernmentAndRecording => "Government & recording",
            Self::Other => "Other",
        }
    }
}

/// A single line of the closing cost breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosingCostItem {
    /// Category key.
    pub category: ClosingCostCategory,
    /// Display name.
    pub name: &'static str,
    /// Rounded amount in whole currency units.
    pub value: Money,
}

/// Categorized one-time closing costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosingCostBreakdown {
    /// Unrounded base: home price × [`CLOSING_COST_RATE`].
    pub base_amount: Money,
    /// Lines in [`ClosingCostCategory::ALL`] order.
    pub items: Vec<ClosingCostItem>,
    /// Sum of the rounded lines. May differ from the base by the rounding residue.
    pub total: Money,
}

impl ClosingCostBreakdown {
    /// Amount for one category.
    #[must_use]
    pub fn value_of(&self, category: ClosingCostCategory) -> Money {
        self.items
            .iter()
            .find(|item| item.category == category)
            .map_or(Money::ZERO, |item| item.value)
    }
}

/// Estimate closing costs for a purchase price.
///
/// Each category is rounded on its own to whole units, half away from zero.
/// The residue against the base is left in place.
#[must_use]
pub fn estimate_closing_costs(home_price: Money) -> ClosingCostBreakdown {
    let base_amount = home_price * CLOSING_COST_RATE;

    let items: Vec<ClosingCostItem> = ClosingCostCategory::ALL
        .iter()
        .map(|&category| ClosingCostItem {
            category,
            name: category.label(),
            value: (base_amount * category.weight()).round_to_unit(),
        })
        .collect();

    let total = items.iter().map(|item| item.value).sum();

    ClosingCostBreakdown {
        base_amount,
        items,
        total,
    }
}

/// Cash the buyer brings to closing, floored at zero.
///
/// `max(0, down_payment + closing_total - seller_credits - lender_credits)`
#[must_use]
pub fn cash_needed_at_closing(
    down_payment: Money,
    closing_total: Money,
    seller_credits: Money,
    lender_credits: Money,
) -> Money {
    (down_payment + closing_total - seller_credits - lender_credits).floor_at_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let total: Decimal = ClosingCostCategory::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn breakdown_for_750k() {
        let breakdown = estimate_closing_costs(Money::from_units(750_000));

        assert_eq!(breakdown.base_amount, Money::from_units(18_750));
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::LenderFees),
            Money::from_units(5_250)
        );
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::TitleAndLegal),
            Money::from_units(4_500)
        );
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::PrepaidTaxesAndInsurance),
            Money::from_units(3_375)
        );
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::GovernmentAndRecording),
            Money::from_units(4_125)
        );
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::Other),
            Money::from_units(1_500)
        );
        assert_eq!(breakdown.total, Money::from_units(18_750));
    }

    #[test]
    fn items_keep_fixed_order() {
        let breakdown = estimate_closing_costs(Money::from_units(400_000));
        let order: Vec<_> = breakdown.items.iter().map(|i| i.category).collect();
        assert_eq!(order, ClosingCostCategory::ALL.to_vec());
    }

    #[test]
    fn per_category_rounding_residue_is_kept() {
        // base = 2_555.75; categories round to 716 + 613 + 460 + 562 + 204 = 2_555
        let breakdown = estimate_closing_costs(Money::from_units(102_230));
        assert_eq!(breakdown.base_amount, Money::new(dec!(2555.75)));
        assert_eq!(breakdown.total, Money::from_units(2_555));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // base = 31.25, other = 2.5 exactly; banker's rounding would give 2
        let breakdown = estimate_closing_costs(Money::from_units(1_250));
        assert_eq!(
            breakdown.value_of(ClosingCostCategory::Other),
            Money::from_units(3)
        );
    }

    #[test]
    fn cash_needed_sums_and_nets_credits() {
        let cash = cash_needed_at_closing(
            Money::from_units(150_000),
            Money::from_units(18_750),
            Money::from_units(5_000),
            Money::from_units(1_000),
        );
        assert_eq!(cash, Money::from_units(162_750));
    }

    #[test]
    fn cash_needed_floors_at_zero() {
        let cash = cash_needed_at_closing(
            Money::from_units(1_000),
            Money::from_units(500),
            Money::from_units(10_000),
            Money::from_units(10_000),
        );
        assert_eq!(cash, Money::ZERO);
    }
}
