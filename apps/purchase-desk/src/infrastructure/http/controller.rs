//! HTTP Controller
//!
//! Routes requests to the calculators, the property lookup service and the
//! scenario workspace.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;

use super::auth;
use super::error::ApiError;
use super::extract::ApiJson;
use super::health::{health_handler, liveness_handler, metrics_handler, readiness_handler};
use super::request::{
    AmortizationRequest, BudgetRequest, ClosingCostsRequest, LoanRequest, PropertyQuery,
    SeedScenarioRequest,
};
use super::response::{
    AmortizationResponse, AnalysisResponse, BudgetResponse, ClosingCostsResponse, FlushResponse,
    PaymentResponse, PropertyResponse, ScenarioResponse,
};
use crate::application::ports::{AuthProviderPort, PropertyLookupError};
use crate::application::services::{PropertyLookupService, ScenarioWorkspace};
use crate::domain::mortgage::{
    MAX_PROJECTION_MONTHS, PurchaseInputs, analyze, cash_needed_at_closing, compare_to_rent,
    estimate_closing_costs, evaluate_budget, monthly_payment, project_amortization,
};
use crate::domain::shared::DomainError;
use crate::infrastructure::metrics::{Calculation, record_calculation, record_http_request};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current purchase scenario.
    pub workspace: Arc<ScenarioWorkspace>,
    /// Account provider.
    pub auth: Arc<dyn AuthProviderPort>,
    /// Property lookup, absent when no provider is configured.
    pub property_lookup: Option<Arc<PropertyLookupService>>,
    /// Server version.
    pub version: String,
    /// Server start time.
    pub started_at: Instant,
    /// Cancelled on shutdown; aborts in-flight lookups.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Create state stamped with the crate version.
    #[must_use]
    pub fn new(
        workspace: Arc<ScenarioWorkspace>,
        auth: Arc<dyn AuthProviderPort>,
        property_lookup: Option<Arc<PropertyLookupService>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            workspace,
            auth,
            property_lookup,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
            cancel,
        }
    }

    fn lookup_service(&self) -> Result<&PropertyLookupService, ApiError> {
        self.property_lookup
            .as_deref()
            .ok_or(ApiError::LookupDisabled)
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/mortgage/payment", post(payment))
        .route("/api/v1/mortgage/amortization", post(amortization))
        .route("/api/v1/closing-costs", post(closing_costs))
        .route("/api/v1/budget", post(budget))
        .route("/api/v1/analysis", post(analysis))
        .route("/api/v1/property", get(property))
        .route("/api/v1/scenario", get(get_scenario).put(put_scenario))
        .route("/api/v1/scenario/seed", post(seed_scenario))
        .route("/api/v1/scenario/flush", post(flush_scenario))
        .route("/api/v1/auth/sign-up", post(auth::sign_up))
        .route("/api/v1/auth/sign-in", post(auth::sign_in))
        .route("/api/v1/auth/sign-out", post(auth::sign_out))
        .route("/api/v1/auth/session", get(auth::session))
        .route("/api/v1/auth/password-reset", post(auth::password_reset))
        .route(
            "/api/v1/auth/profile",
            get(auth::get_profile).patch(auth::update_profile),
        )
        .route_layer(middleware::from_fn(track_latency))
        .with_state(state)
}

async fn track_latency(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |path| path.as_str().to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    record_http_request(&route, response.status().as_u16(), started.elapsed());
    response
}

// =============================================================================
// Calculators
// =============================================================================

async fn payment(ApiJson(request): ApiJson<LoanRequest>) -> Result<Json<PaymentResponse>, ApiError> {
    let terms = request.to_terms()?;
    let payment = monthly_payment(&terms);
    record_calculation(Calculation::Payment);
    Ok(Json(PaymentResponse::new(&terms, payment)))
}

async fn amortization(
    ApiJson(request): ApiJson<AmortizationRequest>,
) -> Result<Json<AmortizationResponse>, ApiError> {
    let terms = request.loan().to_terms()?;
    if request.horizon_months == 0 || request.horizon_months > MAX_PROJECTION_MONTHS {
        return Err(DomainError::invalid(
            "horizon_months",
            format!("horizon must be between 1 and {MAX_PROJECTION_MONTHS} months"),
        )
        .into());
    }

    let projection = project_amortization(&terms, request.horizon_months);
    record_calculation(Calculation::Amortization);
    Ok(Json(AmortizationResponse::new(&terms, &projection)))
}

async fn closing_costs(
    ApiJson(request): ApiJson<ClosingCostsRequest>,
) -> Result<Json<ClosingCostsResponse>, ApiError> {
    request.validate()?;

    let breakdown = estimate_closing_costs(request.home_price);
    let cash_needed = cash_needed_at_closing(
        request.down_payment,
        breakdown.total,
        request.seller_credits,
        request.lender_credits,
    );
    record_calculation(Calculation::ClosingCosts);
    Ok(Json(ClosingCostsResponse::new(&breakdown, cash_needed)))
}

async fn budget(ApiJson(request): ApiJson<BudgetRequest>) -> Result<Json<BudgetResponse>, ApiError> {
    request.validate()?;

    let assessment = evaluate_budget(&request.costs, request.monthly_income);
    let rent = request
        .current_rent
        .map(|rent| compare_to_rent(request.costs.total(), rent));
    record_calculation(Calculation::Budget);
    Ok(Json(BudgetResponse::new(
        &request.costs,
        &assessment,
        rent.as_ref(),
    )))
}

async fn analysis(
    ApiJson(inputs): ApiJson<PurchaseInputs>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let analysis = analyze(&inputs)?;
    record_calculation(Calculation::Analysis);
    Ok(Json(AnalysisResponse::new(&inputs, &analysis)?))
}

// =============================================================================
// Property Lookup
// =============================================================================

async fn property(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let service = state.lookup_service()?;
    let address = query
        .address
        .ok_or_else(|| PropertyLookupError::InvalidAddress {
            message: "address query parameter is required".to_string(),
        })?;

    let record = service.lookup(&address, &state.cancel).await?;
    Ok(Json(PropertyResponse::from(record)))
}

// =============================================================================
// Scenario
// =============================================================================

fn scenario_response(workspace: &ScenarioWorkspace) -> Result<ScenarioResponse, ApiError> {
    let (inputs, analysis) = workspace.snapshot();
    let analysis = AnalysisResponse::new(&inputs, &analysis)?;
    Ok(ScenarioResponse {
        inputs,
        analysis,
        pending_save: workspace.has_pending_changes(),
    })
}

async fn get_scenario(State(state): State<AppState>) -> Result<Json<ScenarioResponse>, ApiError> {
    Ok(Json(scenario_response(&state.workspace)?))
}

async fn put_scenario(
    State(state): State<AppState>,
    ApiJson(inputs): ApiJson<PurchaseInputs>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    state.workspace.update(inputs)?;
    Ok(Json(scenario_response(&state.workspace)?))
}

async fn seed_scenario(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SeedScenarioRequest>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    let service = state.lookup_service()?;
    let record = service.lookup(&request.address, &state.cancel).await?;

    let mut inputs = state.workspace.inputs();
    inputs.seed_from_property(&record);
    state.workspace.update(inputs)?;
    Ok(Json(scenario_response(&state.workspace)?))
}

async fn flush_scenario(State(state): State<AppState>) -> Result<Json<FlushResponse>, ApiError> {
    let written = state.workspace.flush().await?;
    Ok(Json(FlushResponse { written }))
}
