//! Composite purchase analysis.
//!
//! Ties the four calculators together for one purchase scenario: the numbers
//! a buyer sees on the dashboard. Pure; validation happens up front and the
//! calculators are then called with inputs that satisfy their preconditions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization::{AmortizationProjection, project_amortization};
use super::budget::{
    BudgetAssessment, HousingCosts, RentComparison, compare_to_rent, evaluate_budget,
};
use super::closing::{ClosingCostBreakdown, cash_needed_at_closing, estimate_closing_costs};
use super::payment::monthly_payment;
use super::terms::LoanTerms;
use crate::domain::property::PropertyRecord;
use crate::domain::shared::{AnnualRate, DomainError, Money};

/// Longest projection horizon, in months.
pub const MAX_PROJECTION_MONTHS: u32 = 1_200;

/// Everything the buyer enters (or a property lookup seeds) for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseInputs {
    /// Purchase price.
    pub home_price: Money,
    /// Cash down payment.
    pub down_payment: Money,
    /// Annual mortgage rate.
    pub annual_rate: AnnualRate,
    /// Loan term in years.
    pub term_years: u32,
    /// Monthly property tax.
    pub monthly_taxes: Money,
    /// Monthly homeowner's insurance.
    pub monthly_insurance: Money,
    /// Monthly HOA dues.
    pub monthly_hoa: Money,
    /// Monthly maintenance reserve.
    pub monthly_maintenance: Money,
    /// Gross monthly household income.
    pub monthly_income: Money,
    /// Rent currently paid.
    pub current_rent: Money,
    /// Seller concessions at closing.
    pub seller_credits: Money,
    /// Lender credits at closing.
    pub lender_credits: Money,
    /// Months of amortization to project.
    pub projection_months: u32,
}

impl Default for PurchaseInputs {
    fn default() -> Self {
        Self {
            home_price: Money::from_units(750_000),
            down_payment: Money::from_units(150_000),
            annual_rate: AnnualRate::from_percent(dec!(6.25)),
            term_years: 30,
            monthly_taxes: Money::from_units(875),
            monthly_insurance: Money::from_units(150),
            monthly_hoa: Money::ZERO,
            monthly_maintenance: Money::from_units(625),
            monthly_income: Money::from_units(12_000),
            current_rent: Money::from_units(3_500),
            seller_credits: Money::ZERO,
            lender_credits: Money::ZERO,
            projection_months: 60,
        }
    }
}

impl PurchaseInputs {
    /// Check every field against the engine's preconditions.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), DomainError> {
        let amounts = [
            ("home_price", self.home_price),
            ("down_payment", self.down_payment),
            ("monthly_taxes", self.monthly_taxes),
            ("monthly_insurance", self.monthly_insurance),
            ("monthly_hoa", self.monthly_hoa),
            ("monthly_maintenance", self.monthly_maintenance),
            ("monthly_income", self.monthly_income),
            ("current_rent", self.current_rent),
            ("seller_credits", self.seller_credits),
            ("lender_credits", self.lender_credits),
        ];
        for (field, amount) in amounts {
            amount.ensure_input_range(field)?;
        }

        if self.down_payment > self.home_price {
            return Err(DomainError::rule(
                "DOWN_PAYMENT_CAP",
                format!(
                    "down payment {} exceeds home price {}",
                    self.down_payment, self.home_price
                ),
            ));
        }

        if self.projection_months == 0 || self.projection_months > MAX_PROJECTION_MONTHS {
            return Err(DomainError::invalid(
                "projection_months",
                format!("horizon must be between 1 and {MAX_PROJECTION_MONTHS} months"),
            ));
        }

        self.loan_terms().map(|_| ())
    }

    /// Amount financed.
    #[must_use]
    pub fn loan_amount(&self) -> Money {
        (self.home_price - self.down_payment).floor_at_zero()
    }

    /// Down payment as a percentage of price (zero for a zero price).
    #[must_use]
    pub fn down_payment_percent(&self) -> Decimal {
        if self.home_price.is_positive() {
            (self.down_payment.amount() / self.home_price.amount() * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        }
    }

    /// Loan terms for the financed amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate or term is out of range.
    pub fn loan_terms(&self) -> Result<LoanTerms, DomainError> {
        LoanTerms::new(self.loan_amount(), self.annual_rate, self.term_years)
    }

    /// Copy the price, tax, insurance and HOA signals of a property record.
    ///
    /// Fields the record has no data for are left untouched. The down
    /// payment keeps its percentage of the old price.
    pub fn seed_from_property(&mut self, record: &PropertyRecord) {
        if let Some(price) = record.price_hint() {
            let down_share = if self.home_price.is_positive() {
                self.down_payment.amount() / self.home_price.amount()
            } else {
                dec!(0.20)
            };
            self.home_price = price;
            self.down_payment = (price * down_share).round();
        }
        if let Some(taxes) = record.monthly_property_tax() {
            self.monthly_taxes = taxes.round();
        }
        if let Some(insurance) = record.monthly_insurance_estimate() {
            self.monthly_insurance = insurance.round();
        }
        if let Some(hoa) = record.monthly_hoa {
            self.monthly_hoa = hoa;
        }
    }
}

/// Dashboard figures for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseAnalysis {
    /// Amount financed.
    pub loan_amount: Money,
    /// Down payment as a percentage of price.
    pub down_payment_percent: Decimal,
    /// Principal and interest per month.
    pub monthly_payment: Money,
    /// Truncated amortization schedule.
    pub amortization: AmortizationProjection,
    /// One-time closing costs.
    pub closing_costs: ClosingCostBreakdown,
    /// Down payment plus closing costs, net of credits.
    pub cash_needed_at_closing: Money,
    /// Recurring monthly costs.
    pub housing_costs: HousingCosts,
    /// Housing share of income.
    pub budget: BudgetAssessment,
    /// Monthly ownership cost versus rent.
    pub rent_comparison: RentComparison,
}

/// Run every calculator for a scenario.
///
/// # Errors
///
/// Returns `DomainError` if the inputs fail [`PurchaseInputs::validate`].
pub fn analyze(inputs: &PurchaseInputs) -> Result<PurchaseAnalysis, DomainError> {
    inputs.validate()?;
    let terms = inputs.loan_terms()?;

    let payment = monthly_payment(&terms);
    let amortization = project_amortization(&terms, inputs.projection_months);
    let closing_costs = estimate_closing_costs(inputs.home_price);
    let cash_needed = cash_needed_at_closing(
        inputs.down_payment,
        closing_costs.total,
        inputs.seller_credits,
        inputs.lender_credits,
    );

    let housing_costs = HousingCosts {
        principal_and_interest: payment,
        taxes: inputs.monthly_taxes,
        insurance: inputs.monthly_insurance,
        hoa: inputs.monthly_hoa,
        maintenance: inputs.monthly_maintenance,
    };
    let budget = evaluate_budget(&housing_costs, inputs.monthly_income);
    let rent_comparison = compare_to_rent(housing_costs.total(), inputs.current_rent);

    Ok(PurchaseAnalysis {
        loan_amount: terms.principal(),
        down_payment_percent: inputs.down_payment_percent(),
        monthly_payment: payment,
        amortization,
        closing_costs,
        cash_needed_at_closing: cash_needed,
        housing_costs,
        budget,
        rent_comparison,
    })
}
