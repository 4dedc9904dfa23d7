//! Scenario Workspace
//!
//! Holds the buyer's current purchase scenario and its analysis. Inputs are
//! restored from the key-value store at startup, the analysis is recomputed
//! only when inputs actually change, and changes are written back after a
//! quiet period so a burst of edits produces a single write.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{KeyValueStorePort, StoreError};
use crate::domain::mortgage::{PurchaseAnalysis, PurchaseInputs, analyze};
use crate::domain::shared::DomainError;
use crate::infrastructure::metrics::{Calculation, record_calculation, record_scenario_save};

/// Storage key used when none is configured.
pub const DEFAULT_SCENARIO_KEY: &str = "purchase-desk/scenario";

/// Scenario workspace errors.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Inputs rejected by validation.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] DomainError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration for the scenario workspace.
#[derive(Debug, Clone)]
pub struct ScenarioWorkspaceConfig {
    /// Key the inputs are stored under.
    pub storage_key: String,
    /// Quiet period before a change is written.
    pub autosave_debounce: Duration,
}

impl Default for ScenarioWorkspaceConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_SCENARIO_KEY.to_string(),
            autosave_debounce: Duration::from_millis(500),
        }
    }
}

#[derive(Debug)]
struct Snapshot {
    inputs: PurchaseInputs,
    analysis: Arc<PurchaseAnalysis>,
    revision: u64,
    saved_revision: u64,
}

/// The live purchase scenario.
pub struct ScenarioWorkspace {
    store: Arc<dyn KeyValueStorePort>,
    config: ScenarioWorkspaceConfig,
    state: Mutex<Snapshot>,
    /// Held from copying the inputs until the store acknowledges the write,
    /// so writes reach the store in revision order.
    save_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ScenarioWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ScenarioWorkspace")
            .field("config", &self.config)
            .field("revision", &state.revision)
            .field("saved_revision", &state.saved_revision)
            .finish_non_exhaustive()
    }
}

impl ScenarioWorkspace {
    /// Load the stored scenario, falling back to defaults.
    ///
    /// Stored inputs that no longer parse or validate are discarded with a
    /// warning rather than failing startup.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the store cannot be read.
    #[instrument(skip_all, fields(key = %config.storage_key))]
    pub async fn restore(
        store: Arc<dyn KeyValueStorePort>,
        config: ScenarioWorkspaceConfig,
    ) -> Result<Arc<Self>, WorkspaceError> {
        let inputs = match store.get(&config.storage_key).await? {
            Some(raw) => match serde_json::from_str::<PurchaseInputs>(&raw) {
                Ok(inputs) => match inputs.validate() {
                    Ok(()) => {
                        info!("Restored saved scenario");
                        inputs
                    }
                    Err(e) => {
                        warn!(error = %e, "Saved scenario is invalid, using defaults");
                        PurchaseInputs::default()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Saved scenario is unreadable, using defaults");
                    PurchaseInputs::default()
                }
            },
            None => PurchaseInputs::default(),
        };

        let analysis = Arc::new(analyze(&inputs)?);
        record_calculation(Calculation::Analysis);

        Ok(Arc::new(Self {
            store,
            config,
            state: Mutex::new(Snapshot {
                inputs,
                analysis,
                revision: 0,
                saved_revision: 0,
            }),
            save_lock: tokio::sync::Mutex::new(()),
        }))
    }

    /// Current inputs.
    #[must_use]
    pub fn inputs(&self) -> PurchaseInputs {
        self.state.lock().inputs.clone()
    }

    /// Analysis of the current inputs.
    #[must_use]
    pub fn analysis(&self) -> Arc<PurchaseAnalysis> {
        Arc::clone(&self.state.lock().analysis)
    }

    /// Inputs and their analysis, read together.
    #[must_use]
    pub fn snapshot(&self) -> (PurchaseInputs, Arc<PurchaseAnalysis>) {
        let state = self.state.lock();
        (state.inputs.clone(), Arc::clone(&state.analysis))
    }

    /// Returns true if there are changes not yet written.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        let state = self.state.lock();
        state.saved_revision < state.revision
    }

    /// Replace the inputs and return the analysis.
    ///
    /// Identical inputs return the existing analysis without recomputing or
    /// scheduling a write. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if the inputs fail validation; the workspace is
    /// left unchanged.
    pub fn update(
        self: &Arc<Self>,
        inputs: PurchaseInputs,
    ) -> Result<Arc<PurchaseAnalysis>, WorkspaceError> {
        {
            let state = self.state.lock();
            if state.inputs == inputs {
                return Ok(Arc::clone(&state.analysis));
            }
        }

        let analysis = Arc::new(analyze(&inputs)?);
        record_calculation(Calculation::Analysis);

        let revision = {
            let mut state = self.state.lock();
            state.inputs = inputs;
            state.analysis = Arc::clone(&analysis);
            state.revision += 1;
            state.revision
        };
        debug!(revision, "Scenario updated");

        self.schedule_autosave(revision);
        Ok(analysis)
    }

    /// Write pending changes now. Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the write fails; the changes stay pending.
    pub async fn flush(&self) -> Result<bool, WorkspaceError> {
        self.persist().await
    }

    fn schedule_autosave(self: &Arc<Self>, revision: u64) {
        let workspace = Arc::clone(self);
        let delay = self.config.autosave_debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // A later edit owns the write.
            if workspace.state.lock().revision != revision {
                return;
            }
            if let Err(e) = workspace.persist().await {
                warn!(error = %e, revision, "Scenario autosave failed");
            }
        });
    }

    async fn persist(&self) -> Result<bool, WorkspaceError> {
        let _saving = self.save_lock.lock().await;

        let (payload, revision) = {
            let state = self.state.lock();
            if state.saved_revision >= state.revision {
                return Ok(false);
            }
            let payload = serde_json::to_string(&state.inputs).map_err(StoreError::from)?;
            (payload, state.revision)
        };

        let result = self.store.set(&self.config.storage_key, payload).await;
        record_scenario_save(result.is_ok());
        result?;

        let mut state = self.state.lock();
        state.saved_revision = state.saved_revision.max(revision);
        drop(state);

        debug!(revision, "Scenario saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::InMemoryKeyValueStore;
    use crate::domain::shared::Money;

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn config() -> ScenarioWorkspaceConfig {
        ScenarioWorkspaceConfig {
            autosave_debounce: DEBOUNCE,
            ..ScenarioWorkspaceConfig::default()
        }
    }

    fn with_price(units: i64) -> PurchaseInputs {
        PurchaseInputs {
            home_price: Money::from_units(units),
            ..PurchaseInputs::default()
        }
    }

    async fn stored(store: &InMemoryKeyValueStore) -> Option<PurchaseInputs> {
        let raw = store.get(DEFAULT_SCENARIO_KEY).await.unwrap()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl KeyValueStorePort for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn restores_defaults_from_empty_store() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store, config()).await.unwrap();

        assert_eq!(workspace.inputs(), PurchaseInputs::default());
        assert!(!workspace.has_pending_changes());
    }

    #[tokio::test]
    async fn restores_saved_inputs() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let saved = with_price(500_000);
        store
            .set(DEFAULT_SCENARIO_KEY, serde_json::to_string(&saved).unwrap())
            .await
            .unwrap();

        let workspace = ScenarioWorkspace::restore(store, config()).await.unwrap();
        assert_eq!(workspace.inputs(), saved);
        assert_eq!(workspace.analysis().loan_amount, Money::from_units(350_000));
    }

    #[tokio::test]
    async fn discards_corrupt_or_invalid_saved_inputs() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        store
            .set(DEFAULT_SCENARIO_KEY, "{not json".to_string())
            .await
            .unwrap();
        let workspace = ScenarioWorkspace::restore(store.clone(), config())
            .await
            .unwrap();
        assert_eq!(workspace.inputs(), PurchaseInputs::default());

        let invalid = PurchaseInputs {
            term_years: 0,
            ..PurchaseInputs::default()
        };
        store
            .set(DEFAULT_SCENARIO_KEY, serde_json::to_string(&invalid).unwrap())
            .await
            .unwrap();
        let workspace = ScenarioWorkspace::restore(store, config()).await.unwrap();
        assert_eq!(workspace.inputs(), PurchaseInputs::default());
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_inputs_reuse_analysis() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store, config()).await.unwrap();

        let before = workspace.analysis();
        let after = workspace.update(PurchaseInputs::default()).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!workspace.has_pending_changes());

        let (inputs, analysis) = workspace.snapshot();
        assert_eq!(inputs, PurchaseInputs::default());
        assert!(Arc::ptr_eq(&analysis, &after));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_update_leaves_workspace_untouched() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store, config()).await.unwrap();

        let err = workspace
            .update(PurchaseInputs {
                down_payment: Money::from_units(10_000_000),
                ..PurchaseInputs::default()
            })
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Invalid(_)));
        assert_eq!(workspace.inputs(), PurchaseInputs::default());
        assert!(!workspace.has_pending_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_waits_for_quiet_period() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store.clone(), config())
            .await
            .unwrap();

        workspace.update(with_price(600_000)).unwrap();
        tokio::time::sleep(DEBOUNCE / 2).await;
        assert!(stored(&store).await.is_none());

        tokio::time::sleep(DEBOUNCE).await;
        tokio::task::yield_now().await;
        assert_eq!(stored(&store).await, Some(with_price(600_000)));
        assert!(!workspace.has_pending_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn latest_edit_wins() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store.clone(), config())
            .await
            .unwrap();

        workspace.update(with_price(600_000)).unwrap();
        tokio::time::sleep(DEBOUNCE / 2).await;
        workspace.update(with_price(650_000)).unwrap();

        // First timer fires here but is superseded.
        tokio::time::sleep(DEBOUNCE / 2 + Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
        assert!(stored(&store).await.is_none());

        tokio::time::sleep(DEBOUNCE).await;
        tokio::task::yield_now().await;
        assert_eq!(stored(&store).await, Some(with_price(650_000)));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_immediately_once() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let workspace = ScenarioWorkspace::restore(store.clone(), config())
            .await
            .unwrap();

        workspace.update(with_price(700_000)).unwrap();
        assert!(workspace.flush().await.unwrap());
        assert_eq!(stored(&store).await, Some(with_price(700_000)));
        assert!(!workspace.flush().await.unwrap());
    }

    /// Store whose first write stalls, standing in for a slow remote store.
    #[derive(Debug, Default)]
    struct StallingStore {
        inner: InMemoryKeyValueStore,
        stalled: AtomicBool,
    }

    const STALL: Duration = Duration::from_millis(200);

    #[async_trait]
    impl KeyValueStorePort for StallingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(STALL).await;
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn flush_during_slow_autosave_keeps_latest_inputs() {
        let store = Arc::new(StallingStore::default());
        let workspace = ScenarioWorkspace::restore(store.clone(), config())
            .await
            .unwrap();

        workspace.update(with_price(500_000)).unwrap();
        // Autosave of the first edit is now stalled inside the store.
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;

        workspace.update(with_price(600_000)).unwrap();
        assert!(workspace.flush().await.unwrap());

        tokio::time::sleep(DEBOUNCE * 4).await;
        tokio::task::yield_now().await;
        assert!(!workspace.has_pending_changes());
        assert_eq!(stored(&store.inner).await, Some(with_price(600_000)));
        assert_eq!(workspace.inputs(), with_price(600_000));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_stays_pending() {
        let workspace = ScenarioWorkspace::restore(Arc::new(FailingStore), config())
            .await
            .unwrap();

        workspace.update(with_price(700_000)).unwrap();
        assert!(matches!(
            workspace.flush().await,
            Err(WorkspaceError::Store(StoreError::Io(_)))
        ));
        assert!(workspace.has_pending_changes());
    }
}
