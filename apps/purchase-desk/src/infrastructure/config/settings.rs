//! Purchase Desk Configuration Settings
//!
//! Configuration types for the service, loaded from environment variables.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::{
    DEFAULT_SCENARIO_KEY, PropertyLookupConfig, RetryConfig, ScenarioWorkspaceConfig,
};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Parse environment from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PRODUCTION" | "PROD" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Check if this is the production environment.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Get the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Property data provider API key.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key.
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// Get the key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP API port (also serves health and metrics).
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

/// Property data provider connection settings.
#[derive(Debug, Clone)]
pub struct PropertyApiSettings {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// API key sent as `X-Api-Key`.
    pub api_key: ApiKey,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Property lookup policy.
#[derive(Debug, Clone)]
pub struct LookupSettings {
    /// Total attempts per lookup, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub retry_initial_delay: Duration,
    /// Cap on the retry delay.
    pub retry_max_delay: Duration,
    /// Records kept in the lookup cache.
    pub cache_capacity: NonZeroUsize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_initial_delay: Duration::from_millis(250),
            retry_max_delay: Duration::from_secs(4),
            cache_capacity: NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Scenario persistence settings.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// JSON file backing the key-value store; in-memory when unset.
    pub path: Option<PathBuf>,
    /// Quiet period before a scenario change is written.
    pub autosave_debounce: Duration,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            autosave_debounce: Duration::from_millis(500),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Server port settings.
    pub server: ServerSettings,
    /// Property provider, if configured.
    pub property_api: Option<PropertyApiSettings>,
    /// Property lookup policy.
    pub lookup: LookupSettings,
    /// Profiles kept in the auth cache.
    pub profile_cache_capacity: NonZeroUsize,
    /// Scenario persistence.
    pub storage: StorageSettings,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerSettings::default(),
            property_api: None,
            lookup: LookupSettings::default(),
            profile_cache_capacity: NonZeroUsize::new(128).unwrap_or(NonZeroUsize::MIN),
            storage: StorageSettings::default(),
        }
    }
}

impl DeskConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the property provider is half-configured or a
    /// capacity is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`DeskConfig::from_env`].
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = var("DESK_ENV")
            .map(|s| Environment::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let server = ServerSettings {
            http_port: parse_or(&var, "DESK_HTTP_PORT", defaults.server.http_port),
        };

        let property_api = match (var("PROPERTY_API_BASE_URL"), var("PROPERTY_API_KEY")) {
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("PROPERTY_API_KEY".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar(
                    "PROPERTY_API_BASE_URL".to_string(),
                ));
            }
            (Some(base_url), Some(api_key)) => {
                let base_url = base_url.trim().trim_end_matches('/').to_string();
                if base_url.is_empty() {
                    return Err(ConfigError::EmptyValue("PROPERTY_API_BASE_URL".to_string()));
                }
                if api_key.trim().is_empty() {
                    return Err(ConfigError::EmptyValue("PROPERTY_API_KEY".to_string()));
                }
                Some(PropertyApiSettings {
                    base_url,
                    api_key: ApiKey::new(api_key.trim().to_string()),
                    timeout: Duration::from_secs(parse_or(&var, "PROPERTY_API_TIMEOUT_SECS", 10)),
                })
            }
        };

        let lookup = LookupSettings {
            max_attempts: parse_or(
                &var,
                "PROPERTY_LOOKUP_MAX_ATTEMPTS",
                defaults.lookup.max_attempts,
            )
            .max(1),
            retry_initial_delay: parse_duration_millis(
                &var,
                "PROPERTY_LOOKUP_RETRY_INITIAL_MS",
                defaults.lookup.retry_initial_delay,
            ),
            retry_max_delay: parse_duration_millis(
                &var,
                "PROPERTY_LOOKUP_RETRY_MAX_MS",
                defaults.lookup.retry_max_delay,
            ),
            cache_capacity: parse_capacity(
                &var,
                "PROPERTY_CACHE_CAPACITY",
                defaults.lookup.cache_capacity,
            )?,
        };

        let profile_cache_capacity = parse_capacity(
            &var,
            "PROFILE_CACHE_CAPACITY",
            defaults.profile_cache_capacity,
        )?;

        let storage = StorageSettings {
            path: var("DESK_STORE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            autosave_debounce: parse_duration_millis(
                &var,
                "SCENARIO_AUTOSAVE_DEBOUNCE_MS",
                defaults.storage.autosave_debounce,
            ),
        };

        Ok(Self {
            environment,
            server,
            property_api,
            lookup,
            profile_cache_capacity,
            storage,
        })
    }

    /// Lookup service configuration.
    #[must_use]
    pub fn lookup_config(&self) -> PropertyLookupConfig {
        PropertyLookupConfig {
            retry: RetryConfig {
                initial_delay: self.lookup.retry_initial_delay,
                max_delay: self.lookup.retry_max_delay,
                max_attempts: self.lookup.max_attempts,
                ..RetryConfig::default()
            },
            cache_capacity: self.lookup.cache_capacity,
        }
    }

    /// Scenario workspace configuration.
    #[must_use]
    pub fn workspace_config(&self) -> ScenarioWorkspaceConfig {
        ScenarioWorkspaceConfig {
            storage_key: DEFAULT_SCENARIO_KEY.to_string(),
            autosave_debounce: self.storage.autosave_debounce,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable has an unusable value.
    #[error("environment variable {key} is invalid: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Why it was rejected.
        message: String,
    },
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_millis<F>(var: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

fn parse_capacity<F>(var: &F, key: &str, default: NonZeroUsize) -> Result<NonZeroUsize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).and_then(|v| v.trim().parse::<usize>().ok()) {
        None => Ok(default),
        Some(n) => NonZeroUsize::new(n).ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: "capacity must be at least 1".to_string(),
        }),
    }
}
