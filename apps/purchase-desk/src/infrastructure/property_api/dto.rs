//! Property provider wire format.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::property::{
    Characteristics, PropertyRecord, PropertyType, RiskFactors, RiskLevel, TaxAssessment,
    Valuation,
};
use crate::domain::shared::Money;

/// `GET /v1/properties` response body.
#[derive(Debug, Deserialize)]
pub struct PropertyResponse {
    pub address: Option<String>,
    pub valuation: Option<ValuationDto>,
    pub tax: Option<TaxDto>,
    pub insurance: Option<InsuranceDto>,
    pub hoa: Option<HoaDto>,
    #[serde(default)]
    pub characteristics: CharacteristicsDto,
    #[serde(default)]
    pub risk: RiskDto,
}

#[derive(Debug, Deserialize)]
pub struct ValuationDto {
    pub estimated_value: Decimal,
    pub range_low: Option<Decimal>,
    pub range_high: Option<Decimal>,
    pub last_sale_price: Option<Decimal>,
    pub last_sale_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct TaxDto {
    pub year: Option<i32>,
    #[serde(default)]
    pub assessed_value: Decimal,
    pub annual_amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct InsuranceDto {
    pub annual_premium_estimate: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct HoaDto {
    pub monthly_fee: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct CharacteristicsDto {
    pub property_type: Option<String>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<Decimal>,
    pub living_area_sqft: Option<u32>,
    pub lot_size_sqft: Option<u32>,
    pub year_built: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RiskDto {
    pub flood_zone: Option<String>,
    pub flood: Option<String>,
    pub wildfire: Option<String>,
    pub earthquake: Option<String>,
}

fn property_type(raw: Option<&str>) -> PropertyType {
    match raw.map(|s| s.trim().to_lowercase().replace(['-', ' '], "_")).as_deref() {
        Some("single_family" | "sfr" | "house") => PropertyType::SingleFamily,
        Some("condo" | "condominium") => PropertyType::Condo,
        Some("townhouse" | "townhome") => PropertyType::Townhouse,
        Some("multi_family" | "duplex" | "triplex" | "fourplex") => PropertyType::MultiFamily,
        _ => PropertyType::Other,
    }
}

fn risk(raw: Option<&str>) -> RiskLevel {
    raw.map_or(RiskLevel::Unknown, RiskLevel::from_str_case_insensitive)
}

impl PropertyResponse {
    /// Map to the domain record. `queried` is used when the provider omits
    /// the address.
    pub fn into_record(self, queried: &str, fetched_at: DateTime<Utc>) -> PropertyRecord {
        PropertyRecord {
            address: self
                .address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| queried.to_string()),
            valuation: self.valuation.map(|v| Valuation {
                estimated_value: Money::new(v.estimated_value),
                range_low: v.range_low.map(Money::new),
                range_high: v.range_high.map(Money::new),
                last_sale_price: v.last_sale_price.map(Money::new),
                last_sale_date: v.last_sale_date,
            }),
            tax_assessment: self.tax.map(|t| TaxAssessment {
                year: t.year,
                assessed_value: Money::new(t.assessed_value),
                annual_tax: Money::new(t.annual_amount),
            }),
            annual_insurance_estimate: self
                .insurance
                .map(|i| Money::new(i.annual_premium_estimate)),
            monthly_hoa: self.hoa.map(|h| Money::new(h.monthly_fee)),
            characteristics: Characteristics {
                property_type: property_type(self.characteristics.property_type.as_deref()),
                bedrooms: self.characteristics.bedrooms,
                bathrooms: self.characteristics.bathrooms,
                square_feet: self.characteristics.living_area_sqft,
                lot_square_feet: self.characteristics.lot_size_sqft,
                year_built: self.characteristics.year_built,
            },
            risk: RiskFactors {
                flood_zone: self.risk.flood_zone.filter(|z| !z.trim().is_empty()),
                flood: risk(self.risk.flood.as_deref()),
                wildfire: risk(self.risk.wildfire.as_deref()),
                earthquake: risk(self.risk.earthquake.as_deref()),
            },
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_aliases() {
        assert_eq!(property_type(Some("Single-Family")), PropertyType::SingleFamily);
        assert_eq!(property_type(Some("condominium")), PropertyType::Condo);
        assert_eq!(property_type(Some("Town Home")), PropertyType::Other);
        assert_eq!(property_type(Some("townhome")), PropertyType::Townhouse);
        assert_eq!(property_type(None), PropertyType::Other);
    }

    #[test]
    fn sparse_body_maps_with_fallbacks() {
        let body: PropertyResponse = serde_json::from_str("{}").unwrap();
        let record = body.into_record("1 main st", DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(record.address, "1 main st");
        assert!(record.valuation.is_none());
        assert_eq!(record.characteristics, Characteristics::default());
        assert_eq!(record.risk.highest(), RiskLevel::Unknown);
    }
}
