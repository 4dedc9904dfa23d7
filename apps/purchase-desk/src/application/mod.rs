//! Application Layer - Services and port definitions.
//!
//! This layer wires the pure mortgage engine to the outside world through
//! port interfaces, adding caching, retry and persistence policy.

/// Port interfaces for external systems (auth, property data, storage).
pub mod ports;

/// Application services for lookups, profiles and the live scenario.
pub mod services;
