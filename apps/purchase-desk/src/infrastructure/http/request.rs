//! HTTP request DTOs.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::identity::{Credentials, Email};
use crate::domain::mortgage::{HousingCosts, LoanTerms};
use crate::domain::shared::{AnnualRate, DomainError, Money};

/// Loan parameters shared by the payment and amortization endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanRequest {
    /// Amount financed.
    pub principal: Money,
    /// Annual rate in percent.
    pub annual_rate_percent: Decimal,
    /// Term in years.
    pub term_years: u32,
}

impl LoanRequest {
    /// Validate into loan terms.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` for out-of-range values.
    pub fn to_terms(&self) -> Result<LoanTerms, DomainError> {
        LoanTerms::new(
            self.principal,
            AnnualRate::try_from_percent(self.annual_rate_percent)?,
            self.term_years,
        )
    }
}

/// `POST /api/v1/mortgage/amortization` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AmortizationRequest {
    /// Amount financed.
    pub principal: Money,
    /// Annual rate in percent.
    pub annual_rate_percent: Decimal,
    /// Term in years.
    pub term_years: u32,
    /// Months to project.
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,
}

const fn default_horizon() -> u32 {
    60
}

impl AmortizationRequest {
    /// Loan portion of the request.
    #[must_use]
    pub fn loan(&self) -> LoanRequest {
        LoanRequest {
            principal: self.principal,
            annual_rate_percent: self.annual_rate_percent,
            term_years: self.term_years,
        }
    }
}

/// `POST /api/v1/closing-costs` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosingCostsRequest {
    /// Purchase price.
    pub home_price: Money,
    /// Down payment, for cash-to-close.
    #[serde(default)]
    pub down_payment: Money,
    /// Seller concessions.
    #[serde(default)]
    pub seller_credits: Money,
    /// Lender credits.
    #[serde(default)]
    pub lender_credits: Money,
}

impl ClosingCostsRequest {
    /// Reject negative or oversized amounts.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.home_price.ensure_input_range("home_price")?;
        self.down_payment.ensure_input_range("down_payment")?;
        self.seller_credits.ensure_input_range("seller_credits")?;
        self.lender_credits.ensure_input_range("lender_credits")?;
        Ok(())
    }
}

/// `POST /api/v1/budget` body.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetRequest {
    /// Monthly housing costs.
    pub costs: HousingCosts,
    /// Gross monthly income.
    pub monthly_income: Money,
    /// Current rent, for the rent comparison.
    pub current_rent: Option<Money>,
}

impl BudgetRequest {
    /// Reject negative or oversized amounts.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let c = &self.costs;
        c.principal_and_interest
            .ensure_input_range("principal_and_interest")?;
        c.taxes.ensure_input_range("taxes")?;
        c.insurance.ensure_input_range("insurance")?;
        c.hoa.ensure_input_range("hoa")?;
        c.maintenance.ensure_input_range("maintenance")?;
        self.monthly_income.ensure_input_range("monthly_income")?;
        if let Some(rent) = self.current_rent {
            rent.ensure_input_range("current_rent")?;
        }
        Ok(())
    }
}

/// `GET /api/v1/property` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyQuery {
    /// Single-line address.
    pub address: Option<String>,
}

/// `POST /api/v1/scenario/seed` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedScenarioRequest {
    /// Address whose record seeds the scenario.
    pub address: String,
}

/// Sign-up and sign-in body.
#[derive(Clone, Deserialize)]
pub struct CredentialsRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Name shown in the app; sign-up only.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .finish()
    }
}

impl CredentialsRequest {
    /// Parse into domain credentials.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` for a malformed email.
    pub fn to_credentials(&self) -> Result<Credentials, DomainError> {
        Ok(Credentials::new(
            Email::parse(&self.email)?,
            self.password.clone(),
        ))
    }
}

/// `POST /api/v1/auth/password-reset` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    /// Account email.
    pub email: String,
}
