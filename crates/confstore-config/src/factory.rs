//! Store construction helpers
//!
//! [`ConfigFactory`] wraps a [`ConfigRegistry`] and fills named stores from a
//! file, a set of defaults, an environment preset or the process environment.

use std::{fmt, path::Path, str::FromStr, sync::Arc};

use confstore_format::ValueTree;
use tracing::{error, info};

use crate::{
    error::{StoreError, StoreResult},
    registry::ConfigRegistry,
    store::ConfigStore,
};

/// Deployment preset for [`ConfigFactory::create_env_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Testing,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Testing => "testing",
        }
    }

    /// Preset entries, in the order they are set
    pub fn defaults(&self) -> Vec<(&'static str, ValueTree)> {
        let (db_host, api_endpoint, log_level, feature_x) = match self {
            Environment::Development => {
                ("localhost", "https://dev.api.example.com", "debug", true)
            }
            Environment::Production => ("prod.db.server", "https://api.example.com", "error", false),
            Environment::Testing => {
                ("test.db.server", "https://test.api.example.com", "info", true)
            }
        };
        vec![
            ("db_host", ValueTree::from(db_host)),
            ("db_port", ValueTree::from(5432)),
            ("api_endpoint", ValueTree::from(api_endpoint)),
            ("log_level", ValueTree::from(log_level)),
            ("feature_x_enabled", ValueTree::from(feature_x)),
        ]
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "testing" => Ok(Environment::Testing),
            other => Err(StoreError::UnsupportedEnvironment(other.to_string())),
        }
    }
}

/// Creates and fills named stores
#[derive(Debug, Clone)]
pub struct ConfigFactory {
    registry: Arc<ConfigRegistry>,
}

impl ConfigFactory {
    pub fn new(registry: Arc<ConfigRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    /// Get or create the named store
    pub fn create_config(&self, name: &str) -> Arc<ConfigStore> {
        self.registry.get_or_create(name)
    }

    /// Get or create the named store and load `path` into it
    pub fn create_from_existing(
        &self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> StoreResult<Arc<ConfigStore>> {
        let path = path.as_ref();
        let store = self.create_config(name);
        if let Err(e) = store.load_from_file(path) {
            error!(
                "Failed to load configuration for {} from {}: {}",
                name,
                path.display(),
                e
            );
            return Err(e);
        }
        Ok(store)
    }

    /// Get or create the named store and set every default in order
    pub fn create_with_defaults<I, K, V>(&self, name: &str, defaults: I) -> StoreResult<Arc<ConfigStore>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ValueTree>,
    {
        let store = self.create_config(name);
        store.update_multiple(defaults)?;
        Ok(store)
    }

    /// Get or create the named store filled with an environment preset
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedEnvironment`] for names other than
    /// `development`, `production` and `testing`; no store is created then.
    pub fn create_env_config(&self, name: &str, environment: &str) -> StoreResult<Arc<ConfigStore>> {
        let environment: Environment = environment.parse()?;
        let store = self.create_config(name);
        store.update_multiple(environment.defaults())?;
        info!("Applied {} preset to configuration {}", environment, name);
        Ok(store)
    }

    /// Get or create the named store and overlay the process environment
    pub fn create_env_loaded_config(&self, name: &str) -> Arc<ConfigStore> {
        let store = self.create_config(name);
        store.load_from_env();
        info!("Configuration loaded from environment variables for: {}", name);
        store
    }
}

impl Default for ConfigFactory {
    fn default() -> Self {
        Self::new(Arc::new(ConfigRegistry::new()))
    }
}
