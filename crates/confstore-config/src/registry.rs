//! Named store registry
//!
//! Hands out shared [`ConfigStore`] handles by name. Creation is a single
//! check-then-insert under the registry lock, so concurrent requests for the
//! same unseen name always observe one store.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::{options::StoreOptions, store::ConfigStore};

/// Name used when callers do not pick one
pub const DEFAULT_INSTANCE: &str = "default";

/// Registry of named configuration stores
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    stores: Mutex<HashMap<String, Arc<ConfigStore>>>,
    options: StoreOptions,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose new stores are created with `options`
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
            options,
        }
    }

    /// Get the store registered under `name`, creating it on first use
    pub fn get_or_create(&self, name: &str) -> Arc<ConfigStore> {
        let mut stores = self.stores.lock();
        let store = stores.entry(name.to_string()).or_insert_with(|| {
            debug!("Creating configuration store: {}", name);
            Arc::new(ConfigStore::with_options(self.options.clone()))
        });
        Arc::clone(store)
    }

    /// Get an existing store without creating one
    pub fn get(&self, name: &str) -> Option<Arc<ConfigStore>> {
        self.stores.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.lock().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.stores.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.lock().is_empty()
    }
}
