//! Mortgage Engine
//!
//! Pure calculators for a home purchase:
//!
//! - [`monthly_payment`]: fixed principal-and-interest payment
//! - [`project_amortization`]: month-by-month schedule over any horizon
//! - [`estimate_closing_costs`] / [`cash_needed_at_closing`]: one-time costs
//! - [`evaluate_budget`] / [`compare_to_rent`]: affordability
//! - [`analyze`]: all of the above for one [`PurchaseInputs`]
//!
//! Nothing here performs I/O. Identical inputs always produce identical
//! outputs, so callers may cache freely.

mod amortization;
mod analysis;
mod budget;
mod closing;
mod payment;
mod terms;

pub use amortization::{AmortizationProjection, AmortizationRow, project_amortization};
pub use analysis::{MAX_PROJECTION_MONTHS, PurchaseAnalysis, PurchaseInputs, analyze};
pub use budget::{
    BudgetAssessment, BudgetClassification, COMFORT_THRESHOLD, HousingCosts, RentComparison,
    RentDirection, STRETCH_THRESHOLD, compare_to_rent, evaluate_budget,
};
pub use closing::{
    CLOSING_COST_RATE, ClosingCostBreakdown, ClosingCostCategory, ClosingCostItem,
    cash_needed_at_closing, estimate_closing_costs,
};
pub use payment::monthly_payment;
pub use terms::{LoanTerms, MAX_PRINCIPAL, MAX_TERM_YEARS};
