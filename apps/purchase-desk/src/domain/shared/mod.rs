//! Shared Domain Types
//!
//! Value objects and errors shared across the mortgage, property and
//! identity contexts.

pub mod errors;
mod money;
mod rate;

pub use errors::DomainError;
pub use money::Money;
pub use rate::{AnnualRate, MAX_ANNUAL_RATE_PERCENT};
