//! Application Ports (Driven)
//!
//! Interfaces to the systems around the purchase desk: the account
//! service, the property data provider and local persistence.

mod auth_provider_port;
mod key_value_store_port;
mod property_data_port;

pub use auth_provider_port::{AuthError, AuthProviderPort};
pub use key_value_store_port::{InMemoryKeyValueStore, KeyValueStorePort, StoreError};
#[cfg(test)]
pub use property_data_port::MockPropertyDataPort;
pub use property_data_port::{PropertyDataPort, PropertyLookupError};
