//! HTTP response DTOs.
//!
//! Money in responses is rounded to cents; the engine keeps full precision
//! internally.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::mortgage::{
    AmortizationProjection, BudgetAssessment, BudgetClassification, ClosingCostBreakdown,
    ClosingCostCategory, HousingCosts, LoanTerms, PurchaseAnalysis, PurchaseInputs,
    RentComparison, RentDirection,
};
use crate::domain::property::PropertyRecord;
use crate::domain::shared::Money;

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Monthly payment result.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    /// Principal and interest per month.
    pub monthly_payment: Money,
    /// Number of payments.
    pub payment_count: u32,
    /// Sum of all payments.
    pub total_of_payments: Money,
    /// Interest over the life of the loan.
    pub total_interest: Money,
}

impl PaymentResponse {
    /// Build from terms and the exact payment.
    #[must_use]
    pub fn new(terms: &LoanTerms, payment: Money) -> Self {
        let total = payment * Decimal::from(terms.payment_count());
        Self {
            monthly_payment: payment.round(),
            payment_count: terms.payment_count(),
            total_of_payments: total.round(),
            total_interest: (total - terms.principal()).round(),
        }
    }
}

/// One schedule row.
#[derive(Debug, Clone, Serialize)]
pub struct AmortizationRowResponse {
    /// Month number, from 1.
    pub month: u32,
    /// Interest portion.
    pub interest: Money,
    /// Principal portion.
    pub principal: Money,
    /// Balance after payment.
    pub ending_balance: Money,
}

/// Amortization projection.
#[derive(Debug, Clone, Serialize)]
pub struct AmortizationResponse {
    /// Fixed monthly payment.
    pub monthly_payment: Money,
    /// Month-by-month rows.
    pub rows: Vec<AmortizationRowResponse>,
    /// Principal retired over the horizon.
    pub total_principal_paid: Money,
    /// Interest paid over the horizon.
    pub total_interest_paid: Money,
    /// Balance after the last projected month.
    pub ending_balance: Money,
}

impl AmortizationResponse {
    /// Build from a projection.
    #[must_use]
    pub fn new(terms: &LoanTerms, projection: &AmortizationProjection) -> Self {
        Self {
            monthly_payment: projection.monthly_payment.round(),
            rows: projection
                .rows
                .iter()
                .map(|row| AmortizationRowResponse {
                    month: row.month,
                    interest: row.interest.round(),
                    principal: row.principal.round(),
                    ending_balance: row.ending_balance.round(),
                })
                .collect(),
            total_principal_paid: projection.total_principal_paid.round(),
            total_interest_paid: projection.total_interest_paid.round(),
            ending_balance: projection.final_balance(terms).round(),
        }
    }
}

/// One closing cost line.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingCostLine {
    /// Category key.
    pub category: ClosingCostCategory,
    /// Display name.
    pub name: &'static str,
    /// Whole-unit amount.
    pub value: Money,
}

/// Closing cost breakdown and cash to close.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingCostsResponse {
    /// Unrounded budget (price × rate), to the cent.
    pub base_amount: Money,
    /// Lines in display order.
    pub items: Vec<ClosingCostLine>,
    /// Sum of lines.
    pub total: Money,
    /// Down payment plus total, net of credits.
    pub cash_needed_at_closing: Money,
}

impl ClosingCostsResponse {
    /// Build from a breakdown.
    #[must_use]
    pub fn new(breakdown: &ClosingCostBreakdown, cash_needed: Money) -> Self {
        Self {
            base_amount: breakdown.base_amount.round(),
            items: breakdown
                .items
                .iter()
                .map(|item| ClosingCostLine {
                    category: item.category,
                    name: item.name,
                    value: item.value,
                })
                .collect(),
            total: breakdown.total,
            cash_needed_at_closing: cash_needed.round(),
        }
    }
}

/// Rent comparison.
#[derive(Debug, Clone, Serialize)]
pub struct RentComparisonResponse {
    /// Ownership cost minus rent.
    pub delta: Money,
    /// More, less or same.
    pub direction: RentDirection,
}

impl From<&RentComparison> for RentComparisonResponse {
    fn from(comparison: &RentComparison) -> Self {
        Self {
            delta: comparison.delta.round(),
            direction: comparison.direction,
        }
    }
}

/// Budget evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetResponse {
    /// Housing share of income, percent, two places.
    pub housing_share_percent: Decimal,
    /// Classification key.
    pub classification: BudgetClassification,
    /// Classification text.
    pub label: &'static str,
    /// P&I + taxes + insurance + HOA.
    pub budget_relevant_total: Money,
    /// Everything, maintenance included.
    pub total_monthly_cost: Money,
    /// Present when rent was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_comparison: Option<RentComparisonResponse>,
}

impl BudgetResponse {
    /// Build from an assessment.
    #[must_use]
    pub fn new(
        costs: &HousingCosts,
        assessment: &BudgetAssessment,
        rent: Option<&RentComparison>,
    ) -> Self {
        Self {
            housing_share_percent: assessment.housing_share_percent(),
            classification: assessment.classification,
            label: assessment.classification.label(),
            budget_relevant_total: costs.budget_relevant_total().round(),
            total_monthly_cost: costs.total().round(),
            rent_comparison: rent.map(RentComparisonResponse::from),
        }
    }
}

/// Monthly cost lines.
#[derive(Debug, Clone, Serialize)]
pub struct HousingCostsResponse {
    /// Mortgage principal and interest.
    pub principal_and_interest: Money,
    /// Property taxes.
    pub taxes: Money,
    /// Homeowner's insurance.
    pub insurance: Money,
    /// HOA dues.
    pub hoa: Money,
    /// Upkeep reserve.
    pub maintenance: Money,
}

impl From<&HousingCosts> for HousingCostsResponse {
    fn from(costs: &HousingCosts) -> Self {
        Self {
            principal_and_interest: costs.principal_and_interest.round(),
            taxes: costs.taxes.round(),
            insurance: costs.insurance.round(),
            hoa: costs.hoa.round(),
            maintenance: costs.maintenance.round(),
        }
    }
}

/// Full dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    /// Amount financed.
    pub loan_amount: Money,
    /// Down payment percentage.
    pub down_payment_percent: Decimal,
    /// Principal and interest per month.
    pub monthly_payment: Money,
    /// Monthly cost lines.
    pub housing_costs: HousingCostsResponse,
    /// Budget evaluation.
    pub budget: BudgetResponse,
    /// Closing costs and cash to close.
    pub closing_costs: ClosingCostsResponse,
    /// Projected schedule.
    pub amortization: AmortizationResponse,
}

impl AnalysisResponse {
    /// Build from an analysis of `inputs`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the inputs no longer form valid terms.
    pub fn new(
        inputs: &PurchaseInputs,
        analysis: &PurchaseAnalysis,
    ) -> Result<Self, crate::domain::shared::DomainError> {
        let terms = inputs.loan_terms()?;
        Ok(Self {
            loan_amount: analysis.loan_amount.round(),
            down_payment_percent: analysis.down_payment_percent,
            monthly_payment: analysis.monthly_payment.round(),
            housing_costs: HousingCostsResponse::from(&analysis.housing_costs),
            budget: BudgetResponse::new(
                &analysis.housing_costs,
                &analysis.budget,
                Some(&analysis.rent_comparison),
            ),
            closing_costs: ClosingCostsResponse::new(
                &analysis.closing_costs,
                analysis.cash_needed_at_closing,
            ),
            amortization: AmortizationResponse::new(&terms, &analysis.amortization),
        })
    }
}

/// Current scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResponse {
    /// Inputs as stored.
    pub inputs: PurchaseInputs,
    /// Dashboard for the inputs.
    pub analysis: AnalysisResponse,
    /// Whether the latest change is still waiting to be saved.
    pub pending_save: bool,
}

/// Result of `POST /api/v1/scenario/flush`.
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Whether anything was written.
    pub written: bool,
}

/// Property record plus derived monthly figures.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    /// Provider record.
    pub property: PropertyRecord,
    /// Annual tax / 12.
    pub monthly_property_tax: Option<Money>,
    /// Annual insurance / 12.
    pub monthly_insurance_estimate: Option<Money>,
    /// Estimate per square foot.
    pub price_per_square_foot: Option<Money>,
    /// Whether the flood zone mandates flood insurance.
    pub requires_flood_insurance: bool,
}

impl From<PropertyRecord> for PropertyResponse {
    fn from(property: PropertyRecord) -> Self {
        Self {
            monthly_property_tax: property.monthly_property_tax().map(|m| m.round()),
            monthly_insurance_estimate: property.monthly_insurance_estimate().map(|m| m.round()),
            price_per_square_foot: property.price_per_square_foot().map(|m| m.round()),
            requires_flood_insurance: property.risk.requires_flood_insurance(),
            property,
        }
    }
}
