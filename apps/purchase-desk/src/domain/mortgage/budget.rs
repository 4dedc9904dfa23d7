//! Housing affordability: budget ratio and rent comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Money;

/// Highest housing share still considered comfortable (inclusive).
pub const COMFORT_THRESHOLD: Decimal = dec!(0.33);

/// Highest housing share considered a stretch rather than over budget (inclusive).
pub const STRETCH_THRESHOLD: Decimal = dec!(0.40);

/// Recurring monthly cost of owning the home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingCosts {
    /// Mortgage principal and interest.
    pub principal_and_interest: Money,
    /// Property taxes.
    pub taxes: Money,
    /// Homeowner's insurance.
    pub insurance: Money,
    /// Homeowners association dues.
    pub hoa: Money,
    /// Upkeep reserve. Not part of the budget ratio.
    pub maintenance: Money,
}

impl HousingCosts {
    /// P&I + taxes + insurance + HOA.
    #[must_use]
    pub fn budget_relevant_total(&self) -> Money {
        self.principal_and_interest + self.taxes + self.insurance + self.hoa
    }

    /// Everything, maintenance included.
    #[must_use]
    pub fn total(&self) -> Money {
        self.budget_relevant_total() + self.maintenance
    }
}

/// Where a housing share falls against the rule-of-thumb thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetClassification {
    /// At or below 33 % of income.
    WithinComfort,
    /// Above 33 % and at most 40 %.
    SlightlyHigh,
    /// Above 40 %.
    AboveComfort,
}

impl BudgetClassification {
    /// Classify a housing share fraction.
    #[must_use]
    pub fn classify(housing_share: Decimal) -> Self {
        if housing_share <= COMFORT_THRESHOLD {
            Self::WithinComfort
        } else if housing_share <= STRETCH_THRESHOLD {
            Self::SlightlyHigh
        } else {
            Self::AboveComfort
        }
    }

    /// Short human-readable verdict.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WithinComfort => "Within comfort range",
            Self::SlightlyHigh => "Slightly high",
            Self::AboveComfort => "Above comfort range",
        }
    }
}

/// Housing share of income and its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetAssessment {
    /// Budget-relevant housing cost divided by gross monthly income.
    pub housing_share: Decimal,
    /// Verdict for `housing_share`.
    pub classification: BudgetClassification,
}

impl BudgetAssessment {
    /// Housing share as a percentage rounded to two places.
    #[must_use]
    pub fn housing_share_percent(&self) -> Decimal {
        self.housing_share
            .checked_mul(dec!(100))
            .unwrap_or(Decimal::MAX)
            .round_dp(2)
    }
}

/// Evaluate the housing share of gross monthly income.
///
/// Zero (or negative) income yields a share of zero rather than an error.
/// A share too large to represent saturates at `Decimal::MAX`.
#[must_use]
pub fn evaluate_budget(costs: &HousingCosts, monthly_income: Money) -> BudgetAssessment {
    let housing_share = if monthly_income.is_positive() {
        costs
            .budget_relevant_total()
            .amount()
            .checked_div(monthly_income.amount())
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    BudgetAssessment {
        housing_share,
        classification: BudgetClassification::classify(housing_share),
    }
}

/// Direction of the ownership cost relative to current rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RentDirection {
    /// Owning costs more than renting.
    More,
    /// Owning costs less than renting.
    Less,
    /// Identical.
    Same,
}

/// Ownership cost versus current rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentComparison {
    /// `total_monthly_cost - current_rent`, signed.
    pub delta: Money,
    /// Sign of `delta`.
    pub direction: RentDirection,
}

/// Compare the full monthly cost of owning (maintenance included) to rent.
#[must_use]
pub fn compare_to_rent(total_monthly_cost: Money, current_rent: Money) -> RentComparison {
    let delta = total_monthly_cost - current_rent;
    let direction = if delta.is_positive() {
        RentDirection::More
    } else if delta.is_negative() {
        RentDirection::Less
    } else {
        RentDirection::Same
    };

    RentComparison { delta, direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn costs(pi: Decimal, taxes: Decimal, insurance: Decimal, hoa: Decimal) -> HousingCosts {
        HousingCosts {
            principal_and_interest: Money::new(pi),
            taxes: Money::new(taxes),
            insurance: Money::new(insurance),
            hoa: Money::new(hoa),
            maintenance: Money::ZERO,
        }
    }

    #[test_case(dec!(0.25), BudgetClassification::WithinComfort ; "well within")]
    #[test_case(dec!(0.33), BudgetClassification::WithinComfort ; "exactly thirty three")]
    #[test_case(dec!(0.3301), BudgetClassification::SlightlyHigh ; "just above thirty three")]
    #[test_case(dec!(0.40), BudgetClassification::SlightlyHigh ; "exactly forty")]
    #[test_case(dec!(0.4001), BudgetClassification::AboveComfort ; "just above forty")]
    #[test_case(dec!(0.75), BudgetClassification::AboveComfort ; "far above")]
    fn classification_thresholds(share: Decimal, expected: BudgetClassification) {
        assert_eq!(BudgetClassification::classify(share), expected);
    }

    #[test]
    fn exact_boundary_from_amounts() {
        let assessment = evaluate_budget(
            &costs(dec!(3000), dec!(200), dec!(100), dec!(0)),
            Money::from_units(10_000),
        );
        assert_eq!(assessment.housing_share, dec!(0.33));
        assert_eq!(
            assessment.classification,
            BudgetClassification::WithinComfort
        );
    }

    #[test]
    fn twelve_thousand_income_scenario() {
        let assessment = evaluate_budget(
            &costs(dec!(3693.02), dec!(875), dec!(150), dec!(0)),
            Money::from_units(12_000),
        );
        assert_eq!(assessment.housing_share_percent(), dec!(39.32));
        assert_eq!(assessment.classification, BudgetClassification::SlightlyHigh);
    }

    #[test]
    fn maintenance_is_excluded_from_ratio() {
        let mut c = costs(dec!(3000), dec!(300), dec!(0), dec!(0));
        let without = evaluate_budget(&c, Money::from_units(10_000));
        c.maintenance = Money::from_units(5_000);
        let with = evaluate_budget(&c, Money::from_units(10_000));
        assert_eq!(without, with);
    }

    #[test]
    fn zero_income_yields_zero_share() {
        let assessment = evaluate_budget(
            &costs(dec!(3000), dec!(0), dec!(0), dec!(0)),
            Money::ZERO,
        );
        assert_eq!(assessment.housing_share, Decimal::ZERO);
        assert_eq!(
            assessment.classification,
            BudgetClassification::WithinComfort
        );
    }

    #[test]
    fn unrepresentable_share_saturates() {
        let assessment = evaluate_budget(
            &costs(dec!(1_000_000_000_000), dec!(0), dec!(0), dec!(0)),
            Money::new(Decimal::new(1, 20)),
        );
        assert_eq!(assessment.housing_share, Decimal::MAX);
        assert_eq!(assessment.housing_share_percent(), Decimal::MAX);
        assert_eq!(
            assessment.classification,
            BudgetClassification::AboveComfort
        );
    }

    #[test]
    fn rent_comparison_directions() {
        let more = compare_to_rent(Money::from_units(4_000), Money::from_units(3_000));
        assert_eq!(more.delta, Money::from_units(1_000));
        assert_eq!(more.direction, RentDirection::More);

        let less = compare_to_rent(Money::from_units(2_500), Money::from_units(3_000));
        assert_eq!(less.delta, Money::from_units(-500));
        assert_eq!(less.direction, RentDirection::Less);

        let same = compare_to_rent(Money::from_units(3_000), Money::from_units(3_000));
        assert_eq!(same.direction, RentDirection::Same);
    }

    #[test]
    fn totals_include_and_exclude_maintenance() {
        let c = HousingCosts {
            principal_and_interest: Money::from_units(2_000),
            taxes: Money::from_units(300),
            insurance: Money::from_units(100),
            hoa: Money::from_units(50),
            maintenance: Money::from_units(250),
        };
        assert_eq!(c.budget_relevant_total(), Money::from_units(2_450));
        assert_eq!(c.total(), Money::from_units(2_700));
    }
}
