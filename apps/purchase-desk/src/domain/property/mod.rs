//! Property Records
//!
//! Provider-agnostic view of a property: valuation, tax assessment,
//! physical characteristics and hazard exposure. Adapters translate their
//! wire format into these types; the mortgage engine only ever sees the
//! plain amounts derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Money;

/// Automated valuation for a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Point estimate of market value.
    pub estimated_value: Money,
    /// Lower bound of the confidence range, if provided.
    pub range_low: Option<Money>,
    /// Upper bound of the confidence range, if provided.
    pub range_high: Option<Money>,
    /// Most recent recorded sale price.
    pub last_sale_price: Option<Money>,
    /// Date of the most recent recorded sale.
    pub last_sale_date: Option<NaiveDate>,
}

/// Assessor's record for the current tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Tax year of the assessment.
    pub year: Option<i32>,
    /// Assessed value.
    pub assessed_value: Money,
    /// Annual property tax bill.
    pub annual_tax: Money,
}

/// Kind of dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// Detached single-family home.
    SingleFamily,
    /// Condominium unit.
    Condo,
    /// Townhouse.
    Townhouse,
    /// Two or more units.
    MultiFamily,
    /// Unknown or unmapped type.
    #[default]
    Other,
}

/// Physical characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Characteristics {
    /// Dwelling type.
    pub property_type: PropertyType,
    /// Bedroom count.
    pub bedrooms: Option<u8>,
    /// Bathroom count (half baths as .5).
    pub bathrooms: Option<Decimal>,
    /// Finished living area.
    pub square_feet: Option<u32>,
    /// Lot size.
    pub lot_square_feet: Option<u32>,
    /// Year of construction.
    pub year_built: Option<u16>,
}

/// Severity of a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No rating available.
    #[default]
    Unknown,
    /// Negligible exposure.
    Minimal,
    /// Below-average exposure.
    Low,
    /// Average exposure.
    Moderate,
    /// Above-average exposure.
    High,
    /// Extreme exposure.
    Severe,
}

impl RiskLevel {
    /// Parse a provider rating, falling back to `Unknown`.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "minimal" | "very_low" | "very low" => Self::Minimal,
            "low" => Self::Low,
            "moderate" | "medium" => Self::Moderate,
            "high" => Self::High,
            "severe" | "extreme" | "very_high" | "very high" => Self::Severe,
            _ => Self::Unknown,
        }
    }
}

/// Hazard exposure for the parcel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskFactors {
    /// FEMA flood zone designation, e.g. `"AE"` or `"X"`.
    pub flood_zone: Option<String>,
    /// Flood risk.
    pub flood: RiskLevel,
    /// Wildfire risk.
    pub wildfire: RiskLevel,
    /// Earthquake risk.
    pub earthquake: RiskLevel,
}

impl RiskFactors {
    /// The most severe of the rated hazards.
    #[must_use]
    pub fn highest(&self) -> RiskLevel {
        self.flood.max(self.wildfire).max(self.earthquake)
    }

    /// Special flood hazard areas (zones starting with A or V) require flood insurance.
    #[must_use]
    pub fn requires_flood_insurance(&self) -> bool {
        self.flood_zone
            .as_deref()
            .and_then(|zone| zone.trim().chars().next())
            .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'A' | 'V'))
    }
}

/// A property as returned by a property data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Normalized single-line address.
    pub address: String,
    /// Valuation, if the provider has one.
    pub valuation: Option<Valuation>,
    /// Tax assessment, if available.
    pub tax_assessment: Option<TaxAssessment>,
    /// Provider's annual homeowner's insurance estimate.
    pub annual_insurance_estimate: Option<Money>,
    /// Monthly HOA dues, if known.
    pub monthly_hoa: Option<Money>,
    /// Physical characteristics.
    #[serde(default)]
    pub characteristics: Characteristics,
    /// Hazard exposure.
    #[serde(default)]
    pub risk: RiskFactors,
    /// When the record was fetched from the provider.
    pub fetched_at: DateTime<Utc>,
}

impl PropertyRecord {
    /// Best available price signal: estimated value, else last sale price.
    #[must_use]
    pub fn price_hint(&self) -> Option<Money> {
        let valuation = self.valuation.as_ref()?;
        if valuation.estimated_value.is_positive() {
            Some(valuation.estimated_value)
        } else {
            valuation.last_sale_price
        }
    }

    /// Annual tax bill spread over twelve months.
    #[must_use]
    pub fn monthly_property_tax(&self) -> Option<Money> {
        self.tax_assessment
            .as_ref()
            .map(|tax| tax.annual_tax / dec!(12))
    }

    /// Annual insurance estimate spread over twelve months.
    #[must_use]
    pub fn monthly_insurance_estimate(&self) -> Option<Money> {
        self.annual_insurance_estimate.map(|annual| annual / dec!(12))
    }

    /// Estimated value per finished square foot.
    #[must_use]
    pub fn price_per_square_foot(&self) -> Option<Money> {
        let price = self.price_hint()?;
        let sqft = self.characteristics.square_feet.filter(|&s| s > 0)?;
        Some(price / Decimal::from(sqft))
    }
}
