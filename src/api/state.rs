//! Application state for the Browo Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::ProgressStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded engine configuration and the progress store.
#[derive(Clone)]
pub struct AppState {
    /// The loaded engine configuration.
    config: Arc<ConfigLoader>,
    /// XP balances and their audit trail.
    store: Arc<ProgressStore>,
}

impl AppState {
    /// Creates a new application state with the given configuration and an empty store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, ProgressStore::new())
    }

    /// Creates a new application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: ProgressStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the progress store.
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }
}
