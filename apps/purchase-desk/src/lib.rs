#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Purchase Desk - Home Purchase Planning Service
//!
//! Calculates what a home purchase costs: the monthly mortgage payment, an
//! amortization projection, estimated closing costs and the cash needed to
//! close, and how the monthly cost of owning compares with income and rent.
//! Property records from a data provider can seed a scenario, and the
//! buyer's current scenario is kept and saved automatically.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure calculations and records
//!   - `mortgage`: Payment, amortization, closing costs, budget, analysis
//!   - `property`: Provider property records
//!   - `identity`: Accounts and sessions
//!   - `shared`: Money, rates, errors
//!
//! - **Application**: Ports and services
//!   - `ports`: Auth provider, property data, key-value store
//!   - `services`: Property lookup, scenario workspace, profile cache
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `http`: JSON API, health and metrics endpoints
//!   - `property_api`: Property provider HTTP client
//!   - `persistence`: JSON file store
//!   - `auth`: Development identity provider
//!   - `config`, `metrics`, `telemetry`
//!
//! # Data Flow
//!
//! ```text
//! HTTP ──► Handlers ──► ScenarioWorkspace ──► analyze() ──► PurchaseAnalysis
//!              │                │
//!              │                └──► KeyValueStore (debounced autosave)
//!              └──► PropertyLookupService ──► LRU ──► PropertyDataPort (retry)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Pure calculations with no I/O.
pub mod domain;

/// Application layer - Ports and services.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::mortgage::{
    LoanTerms, PurchaseAnalysis, PurchaseInputs, analyze, estimate_closing_costs,
    evaluate_budget, monthly_payment, project_amortization,
};
pub use domain::shared::{AnnualRate, DomainError, Money};

// Services
pub use application::services::{
    CachedAuthProvider, PropertyLookupService, ScenarioWorkspace, WorkspaceError,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, DeskConfig, Environment};

// HTTP server
pub use infrastructure::http::{AppState, HttpServer, HttpServerError, create_router};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
