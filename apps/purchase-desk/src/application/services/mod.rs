//! Application Services
//!
//! Services that sit between the HTTP surface and the ports.
//!
//! - `PropertyLookupService`: cached, retrying property lookups
//! - `CachedAuthProvider`: profile cache in front of the auth provider
//! - `ScenarioWorkspace`: current scenario with debounced autosave

mod cached_auth;
mod lru;
mod property_lookup;
mod retry;
mod scenario_workspace;

pub use cached_auth::CachedAuthProvider;
pub use lru::LruCache;
pub use property_lookup::{
    MAX_ADDRESS_LENGTH, PropertyLookupConfig, PropertyLookupService, normalize_address,
};
pub use retry::{RetryConfig, RetryPolicy};
pub use scenario_workspace::{
    DEFAULT_SCENARIO_KEY, ScenarioWorkspace, ScenarioWorkspaceConfig, WorkspaceError,
};
