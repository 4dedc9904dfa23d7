//! Purchase Desk Binary
//!
//! Starts the purchase planning HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin purchase-desk
//! ```
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DESK_ENV`: development | production (default: development)
//! - `DESK_HTTP_PORT`: HTTP port (default: 8080)
//! - `PROPERTY_API_BASE_URL`, `PROPERTY_API_KEY`: Property provider (both or neither)
//! - `PROPERTY_API_TIMEOUT_SECS`: Provider request timeout (default: 10)
//! - `PROPERTY_LOOKUP_MAX_ATTEMPTS`: Attempts per lookup (default: 3)
//! - `PROPERTY_CACHE_CAPACITY`: Cached property records (default: 256)
//! - `PROFILE_CACHE_CAPACITY`: Cached user profiles (default: 128)
//! - `DESK_STORE_PATH`: JSON file for saved scenarios (default: in-memory)
//! - `SCENARIO_AUTOSAVE_DEBOUNCE_MS`: Autosave quiet period (default: 500)
//! - `OTEL_ENABLED`: Export spans over OTLP (default: false)
//! - `RUST_LOG`: Log filter (default: purchase_desk=info)

use std::sync::Arc;

use purchase_desk::application::ports::{InMemoryKeyValueStore, KeyValueStorePort};
use purchase_desk::application::services::{CachedAuthProvider, PropertyLookupService};
use purchase_desk::infrastructure::auth::InMemoryAuthProvider;
use purchase_desk::infrastructure::persistence::JsonFileKeyValueStore;
use purchase_desk::infrastructure::property_api::PropertyApiClient;
use purchase_desk::infrastructure::telemetry;
use purchase_desk::{AppState, DeskConfig, HttpServer, ScenarioWorkspace, init_metrics};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    // Initialize telemetry (tracing + optional OTLP)
    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting Purchase Desk");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = DeskConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let store: Arc<dyn KeyValueStorePort> = match &config.storage.path {
        Some(path) => Arc::new(JsonFileKeyValueStore::open(path.clone()).await?),
        None => {
            tracing::warn!("DESK_STORE_PATH not set, scenarios will not survive a restart");
            Arc::new(InMemoryKeyValueStore::new())
        }
    };
    let workspace = ScenarioWorkspace::restore(store, config.workspace_config()).await?;

    let property_lookup = match &config.property_api {
        Some(settings) => {
            let client = PropertyApiClient::new(settings)?;
            Some(Arc::new(PropertyLookupService::new(
                Arc::new(client),
                config.lookup_config(),
            )))
        }
        None => {
            tracing::warn!("Property provider not configured, lookups disabled");
            None
        }
    };

    // Development identity provider; accounts live for the process lifetime.
    let auth = Arc::new(CachedAuthProvider::new(
        InMemoryAuthProvider::new(),
        config.profile_cache_capacity,
    ));

    let state = AppState::new(
        Arc::clone(&workspace),
        auth,
        property_lookup,
        shutdown_token.clone(),
    );
    let http_server = HttpServer::new(config.server.http_port, state, shutdown_token.clone());

    let server_handle = tokio::spawn(async move {
        if let Err(e) = http_server.run().await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    tracing::info!("Purchase Desk ready");

    await_shutdown(shutdown_token).await;

    if let Err(e) = server_handle.await {
        tracing::error!(error = %e, "HTTP server task panicked");
    }

    match workspace.flush().await {
        Ok(true) => tracing::info!("Saved pending scenario changes"),
        Ok(false) => {}
        Err(e) => tracing::error!(error = %e, "Failed to save scenario on shutdown"),
    }

    tracing::info!("Purchase Desk stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &DeskConfig) {
    tracing::info!(
        environment = config.environment.as_str(),
        http_port = config.server.http_port,
        property_lookup = config.property_api.is_some(),
        persistent_store = config.storage.path.is_some(),
        "Configuration loaded"
    );
    if let Some(settings) = &config.property_api {
        tracing::debug!(
            base_url = %settings.base_url,
            timeout_ms = u64::try_from(settings.timeout.as_millis()).unwrap_or(u64::MAX),
            "Property provider"
        );
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
