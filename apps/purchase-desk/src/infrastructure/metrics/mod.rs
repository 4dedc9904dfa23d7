//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Calculations**: Engine invocations by calculator
//! - **Property lookups**: Outcomes, retries and provider latency
//! - **Caches**: Profile cache hits and misses
//! - **Persistence**: Scenario autosave writes
//! - **HTTP**: Request latency by route and status
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP server port. Recording
//! before [`init_metrics`] is a no-op.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if another global recorder was installed first.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "purchase_desk_calculations_total",
        "Total calculator invocations by calculator"
    );

    describe_counter!(
        "purchase_desk_property_lookups_total",
        "Total property lookups by outcome"
    );
    describe_counter!(
        "purchase_desk_property_lookup_retries_total",
        "Total retried property provider requests"
    );
    describe_histogram!(
        "purchase_desk_property_lookup_seconds",
        "Property provider round-trip time, retries included"
    );

    describe_counter!(
        "purchase_desk_profile_cache_total",
        "Profile cache lookups by result"
    );

    describe_counter!(
        "purchase_desk_scenario_saves_total",
        "Scenario autosave writes by result"
    );

    describe_histogram!(
        "purchase_desk_http_request_seconds",
        "HTTP request latency by route and status"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Metric labels for calculators.
#[derive(Debug, Clone, Copy)]
pub enum Calculation {
    /// Monthly payment.
    Payment,
    /// Amortization projection.
    Amortization,
    /// Closing cost breakdown.
    ClosingCosts,
    /// Budget ratio.
    Budget,
    /// Full purchase analysis.
    Analysis,
}

impl Calculation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Amortization => "amortization",
            Self::ClosingCosts => "closing_costs",
            Self::Budget => "budget",
            Self::Analysis => "analysis",
        }
    }
}

/// Metric labels for property lookup outcomes.
#[derive(Debug, Clone, Copy)]
pub enum LookupOutcome {
    /// Served from the cache.
    CacheHit,
    /// Fetched from the provider.
    Fetched,
    /// Provider had no record.
    NotFound,
    /// Failed after retries.
    Failed,
    /// Caller cancelled.
    Cancelled,
}

impl LookupOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::CacheHit => "cache_hit",
            Self::Fetched => "fetched",
            Self::NotFound => "not_found",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Record a calculator invocation.
pub fn record_calculation(calculation: Calculation) {
    counter!(
        "purchase_desk_calculations_total",
        "calculation" => calculation.as_str()
    )
    .increment(1);
}

/// Record the outcome of a property lookup.
pub fn record_property_lookup(outcome: LookupOutcome) {
    counter!(
        "purchase_desk_property_lookups_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a retried provider request.
pub fn record_property_lookup_retry() {
    counter!("purchase_desk_property_lookup_retries_total").increment(1);
}

/// Record provider round-trip time.
pub fn record_property_lookup_duration(duration: Duration) {
    histogram!("purchase_desk_property_lookup_seconds").record(duration.as_secs_f64());
}

/// Record a profile cache lookup.
pub fn record_profile_cache(hit: bool) {
    counter!(
        "purchase_desk_profile_cache_total",
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

/// Record a scenario autosave write.
pub fn record_scenario_save(success: bool) {
    counter!(
        "purchase_desk_scenario_saves_total",
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// Record HTTP request latency.
pub fn record_http_request(route: &str, status: u16, duration: Duration) {
    histogram!(
        "purchase_desk_http_request_seconds",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
