//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Development identity provider.
pub mod auth;

/// Configuration loading.
pub mod config;

/// HTTP API and health endpoints.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Key-value store adapters.
pub mod persistence;

/// Property data provider client.
pub mod property_api;

/// Tracing and OpenTelemetry integration.
pub mod telemetry;
