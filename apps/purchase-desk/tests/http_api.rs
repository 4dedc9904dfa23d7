//! HTTP API Integration Tests
//!
//! Drives the router against a mocked property provider and a JSON file
//! store, the way the binary wires them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use purchase_desk::application::ports::KeyValueStorePort;
use purchase_desk::application::services::{
    PropertyLookupConfig, RetryConfig, ScenarioWorkspaceConfig,
};
use purchase_desk::infrastructure::auth::InMemoryAuthProvider;
use purchase_desk::infrastructure::config::{ApiKey, PropertyApiSettings};
use purchase_desk::infrastructure::persistence::JsonFileKeyValueStore;
use purchase_desk::infrastructure::property_api::PropertyApiClient;
use purchase_desk::{
    AppState, CachedAuthProvider, PropertyLookupService, ScenarioWorkspace, create_router,
};

struct Harness {
    state: AppState,
    store_path: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

fn workspace_config() -> ScenarioWorkspaceConfig {
    ScenarioWorkspaceConfig {
        autosave_debounce: Duration::from_secs(60),
        ..ScenarioWorkspaceConfig::default()
    }
}

async fn harness(provider: &MockServer) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("scenarios.json");
    let store: Arc<dyn KeyValueStorePort> =
        Arc::new(JsonFileKeyValueStore::open(store_path.clone()).await.unwrap());
    let workspace = ScenarioWorkspace::restore(store, workspace_config())
        .await
        .unwrap();

    let client = PropertyApiClient::new(&PropertyApiSettings {
        base_url: provider.uri(),
        api_key: ApiKey::new("integration-key".to_string()),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let lookup = PropertyLookupService::new(
        Arc::new(client),
        PropertyLookupConfig {
            retry: RetryConfig {
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
                ..RetryConfig::default()
            },
            ..PropertyLookupConfig::default()
        },
    );

    let auth = Arc::new(CachedAuthProvider::new(
        InMemoryAuthProvider::new(),
        NonZeroUsize::new(4).unwrap(),
    ));

    Harness {
        state: AppState::new(
            workspace,
            auth,
            Some(Arc::new(lookup)),
            CancellationToken::new(),
        ),
        store_path,
        _dir: dir,
    }
}

async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn provider_record() -> Value {
    json!({
        "address": "42 Harbor Rd, Portland, ME 04101",
        "valuation": { "estimated_value": 500000 },
        "tax": { "year": 2025, "assessed_value": 480000, "annual_amount": 7200 },
        "insurance": { "annual_premium_estimate": 2400 },
        "hoa": { "monthly_fee": 125 },
        "characteristics": { "property_type": "condo", "living_area_sqft": 1250 },
        "risk": { "flood_zone": "AE", "flood": "high" }
    })
}

#[tokio::test]
async fn seeded_scenario_survives_restart() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/properties"))
        .and(query_param("address", "42 harbor rd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_record()))
        .expect(1)
        .mount(&provider)
        .await;

    let harness = harness(&provider).await;

    let (status, body) = call(&harness.state, get("/api/v1/property?address=42%20Harbor%20Rd")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["monthly_property_tax"]), dec!(600));
    assert_eq!(body["requires_flood_insurance"], true);

    // Served from the cache; the provider expects exactly one call.
    let (status, body) = call(
        &harness.state,
        post("/api/v1/scenario/seed", &json!({ "address": "  42 harbor   RD " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["inputs"]["home_price"]), dec!(500000));
    assert_eq!(decimal(&body["inputs"]["down_payment"]), dec!(100000));
    assert_eq!(decimal(&body["inputs"]["monthly_taxes"]), dec!(600));
    assert_eq!(decimal(&body["inputs"]["monthly_insurance"]), dec!(200));
    assert_eq!(decimal(&body["inputs"]["monthly_hoa"]), dec!(125));
    assert_eq!(body["pending_save"], true);

    let (status, body) = call(&harness.state, post("/api/v1/scenario/flush", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["written"], true);

    let reopened: Arc<dyn KeyValueStorePort> =
        Arc::new(JsonFileKeyValueStore::open(harness.store_path.clone()).await.unwrap());
    let restored = ScenarioWorkspace::restore(reopened, workspace_config())
        .await
        .unwrap();
    assert_eq!(restored.inputs(), harness.state.workspace.inputs());
}

#[tokio::test]
async fn provider_outage_surfaces_as_bad_gateway_after_retries() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/properties"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&provider)
        .await;

    let harness = harness(&provider).await;
    let (status, body) = call(&harness.state, get("/api/v1/property?address=1%20Elm%20St")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "provider_unavailable");
}

#[tokio::test]
async fn unknown_address_is_not_retried() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/properties"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&provider)
        .await;

    let harness = harness(&provider).await;
    let (status, body) = call(&harness.state, get("/api/v1/property?address=nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "property_not_found");
}

#[tokio::test]
async fn shutdown_cancels_lookups() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_record()))
        .expect(0)
        .mount(&provider)
        .await;

    let harness = harness(&provider).await;
    harness.state.cancel.cancel();

    let (status, body) = call(&harness.state, get("/api/v1/property?address=42%20Harbor%20Rd")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "cancelled");

    let response = create_router(harness.state.clone())
        .oneshot(get("/readyz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
