//! Configuration Module
//!
//! Configuration loading for the purchase desk service.

mod settings;

pub use settings::{
    ApiKey, ConfigError, DeskConfig, Environment, LookupSettings, PropertyApiSettings,
    ServerSettings, StorageSettings,
};
