//! Property Lookup Service
//!
//! Address normalization, caching and retry around a [`PropertyDataPort`].

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::lru::LruCache;
use super::retry::{RetryConfig, RetryPolicy};
use crate::application::ports::{PropertyDataPort, PropertyLookupError};
use crate::domain::property::PropertyRecord;
use crate::infrastructure::metrics::{
    LookupOutcome, record_property_lookup, record_property_lookup_duration,
    record_property_lookup_retry,
};

/// Longest address accepted.
pub const MAX_ADDRESS_LENGTH: usize = 256;

/// Configuration for the property lookup service.
#[derive(Debug, Clone)]
pub struct PropertyLookupConfig {
    /// Backoff for retryable provider errors.
    pub retry: RetryConfig,
    /// Number of records kept in memory.
    pub cache_capacity: NonZeroUsize,
}

impl Default for PropertyLookupConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            cache_capacity: NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Trim, collapse internal whitespace and case-fold an address.
///
/// # Errors
///
/// Returns `InvalidAddress` for a blank or overlong address.
pub fn normalize_address(raw: &str) -> Result<String, PropertyLookupError> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(PropertyLookupError::InvalidAddress {
            message: "address is empty".to_string(),
        });
    }
    if normalized.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(PropertyLookupError::InvalidAddress {
            message: format!("address exceeds {MAX_ADDRESS_LENGTH} characters"),
        });
    }
    Ok(normalized.to_lowercase())
}

/// Cached, retrying property lookups.
pub struct PropertyLookupService {
    source: Arc<dyn PropertyDataPort>,
    config: PropertyLookupConfig,
    cache: Mutex<LruCache<String, PropertyRecord>>,
}

impl std::fmt::Debug for PropertyLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyLookupService")
            .field("config", &self.config)
            .field("cached", &self.cache.lock().len())
            .finish_non_exhaustive()
    }
}

impl PropertyLookupService {
    /// Create a service over a property data source.
    #[must_use]
    pub fn new(source: Arc<dyn PropertyDataPort>, config: PropertyLookupConfig) -> Self {
        let cache = Mutex::new(LruCache::new(config.cache_capacity));
        Self {
            source,
            config,
            cache,
        }
    }

    /// Look up a property, from cache when possible.
    ///
    /// Retryable provider errors are retried with backoff until attempts
    /// run out. Cancelling `cancel` aborts the lookup, including any
    /// in-flight request or backoff sleep.
    ///
    /// # Errors
    ///
    /// Returns the last provider error, `InvalidAddress`, or `Cancelled`.
    #[instrument(skip(self, cancel), fields(address = %address))]
    pub async fn lookup(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<PropertyRecord, PropertyLookupError> {
        let key = normalize_address(address)?;

        if let Some(record) = self.cache.lock().get(&key) {
            debug!("Property served from cache");
            record_property_lookup(LookupOutcome::CacheHit);
            return Ok(record);
        }

        let started = Instant::now();
        let result = self.fetch_with_retry(&key, cancel).await;
        record_property_lookup_duration(started.elapsed());

        match &result {
            Ok(record) => {
                info!(fetched_at = %record.fetched_at, "Property fetched");
                record_property_lookup(LookupOutcome::Fetched);
                self.cache.lock().insert(key, record.clone());
            }
            Err(PropertyLookupError::NotFound { .. }) => {
                record_property_lookup(LookupOutcome::NotFound);
            }
            Err(PropertyLookupError::Cancelled) => {
                record_property_lookup(LookupOutcome::Cancelled);
            }
            Err(e) => {
                warn!(error = %e, "Property lookup failed");
                record_property_lookup(LookupOutcome::Failed);
            }
        }

        result
    }

    /// Drop a cached record so the next lookup hits the provider.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` for a blank or overlong address.
    pub fn invalidate(&self, address: &str) -> Result<bool, PropertyLookupError> {
        let key = normalize_address(address)?;
        Ok(self.cache.lock().remove(&key).is_some())
    }

    /// Number of cached records.
    #[must_use]
    pub fn cached_records(&self) -> usize {
        self.cache.lock().len()
    }

    async fn fetch_with_retry(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<PropertyRecord, PropertyLookupError> {
        let mut policy = RetryPolicy::new(self.config.retry.clone());

        loop {
            if cancel.is_cancelled() {
                return Err(PropertyLookupError::Cancelled);
            }

            policy.begin_attempt();
            let attempt = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(PropertyLookupError::Cancelled),
                result = self.source.lookup_by_address(address) => result,
            };

            let err = match attempt {
                Ok(record) => return Ok(record),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            let Some(delay) = policy.next_delay() else {
                return Err(err);
            };

            warn!(
                attempt = policy.attempts(),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "Retrying property lookup"
            );
            record_property_lookup_retry();

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(PropertyLookupError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
