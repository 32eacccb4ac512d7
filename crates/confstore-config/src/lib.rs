//! Confstore configuration store
//!
//! A thread-safe key/value store of [`ValueTree`] values with change listeners,
//! JSON/YAML persistence (full, partial and versioned), an environment overlay
//! and a registry of named stores.
//!
//! ```ignore
//! use confstore_config::{ConfigRegistry, ValueTree};
//!
//! let registry = ConfigRegistry::new();
//! let store = registry.get_or_create("app");
//! store.set("port", 8080)?;
//! store.save_to_file("app.yaml")?;
//! ```

pub mod error;
pub mod factory;
pub mod options;
pub mod persist;
pub mod registry;
pub mod store;

pub use confstore_format::{Mapping, OutputFormat, ValueTree};
pub use error::{IoOperation, StoreError, StoreResult};
pub use factory::{ConfigFactory, Environment};
pub use options::{StoreOptions, DEFAULT_VERSION};
pub use persist::PersistFormat;
pub use registry::{ConfigRegistry, DEFAULT_INSTANCE};
pub use store::{set_format_and_output, ChangeListener, ConfigStore};
