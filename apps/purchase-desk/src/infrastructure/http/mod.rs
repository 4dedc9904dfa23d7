//! HTTP API
//!
//! JSON endpoints for the calculators, property lookup, accounts and the
//! saved scenario, plus health and Prometheus metrics.

mod auth;
mod controller;
mod error;
mod extract;
mod health;
mod request;
mod response;
mod server;

pub use auth::SessionStatus;
pub use controller::{AppState, create_router};
pub use error::ApiError;
pub use health::{HealthResponse, HealthStatus};
pub use request::{
    AmortizationRequest, BudgetRequest, ClosingCostsRequest, CredentialsRequest, LoanRequest,
    PasswordResetRequest, PropertyQuery, SeedScenarioRequest,
};
pub use response::{
    AmortizationResponse, AnalysisResponse, BudgetResponse, ClosingCostsResponse, ErrorResponse,
    FlushResponse, PaymentResponse, PropertyResponse, ScenarioResponse,
};
pub use server::{HttpServer, HttpServerError};
