//! Thread-safe configuration store
//!
//! A [`ConfigStore`] owns a mapping from key to [`ValueTree`] behind a single
//! mutex, together with its change listeners, version tag and the record of
//! keys last overlaid from the environment.
//!
//! Listeners run synchronously under the store's lock, in registration order,
//! before `set` returns. A listener must not call back into the store that is
//! notifying it: doing so panics instead of deadlocking.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    io::{self, Write},
    path::Path,
};

use confstore_format::{
    default_factory, ensure_finite_entries, get_output_format, set_output_format,
    to_pretty_json, Mapping, OutputFormat, SerializerFactory, ValueTree, DEFAULT_JSON_INDENT,
};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::{
    error::{IoOperation, StoreError, StoreResult},
    options::StoreOptions,
    persist::{self, PersistFormat},
};

/// Key whose value must always be a string
const EXAMPLE_KEY: &str = "example";

/// Key holding the version tag in persisted documents
const VERSION_KEY: &str = "version";

/// Callback invoked with `(key, new_value)` after every successful `set`
pub type ChangeListener = Box<dyn Fn(&str, &ValueTree) + Send + Sync>;

thread_local! {
    /// Stores currently running callbacks on this thread, by address
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a store as dispatching callbacks on the current thread
struct DispatchGuard {
    id: usize,
}

impl DispatchGuard {
    fn enter(id: usize) -> Self {
        DISPATCHING.with(|active| active.borrow_mut().push(id));
        Self { id }
    }

    fn is_active(id: usize) -> bool {
        DISPATCHING.with(|active| active.borrow().contains(&id))
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|id| *id == self.id) {
                active.remove(pos);
            }
        });
    }
}

struct StoreState {
    entries: BTreeMap<String, ValueTree>,
    listeners: Vec<ChangeListener>,
    version: String,
    env_overrides: BTreeMap<String, String>,
}

/// Lock-protected key/value configuration store
pub struct ConfigStore {
    state: Mutex<StoreState>,
    options: StoreOptions,
}

impl ConfigStore {
    /// Create an empty store with default options
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Create an empty store with the given options
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: BTreeMap::new(),
                listeners: Vec::new(),
                version: options.default_version.clone(),
                env_overrides: BTreeMap::new(),
            }),
            options,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn id(&self) -> usize {
        self as *const Self as usize
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        if DispatchGuard::is_active(self.id()) {
            panic!(
                "ConfigStore re-entered from a change listener or validator; \
                 callbacks must not call back into the store that invoked them"
            );
        }
        self.state.lock()
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> StoreResult<ValueTree> {
        self.lock()
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::key_not_found(key))
    }

    /// Insert or overwrite a value, then notify every listener
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `key` is empty, or if `key`
    /// is `"example"` and the value is not a string.
    pub fn set(&self, key: &str, value: impl Into<ValueTree>) -> StoreResult<()> {
        let value = value.into();
        if key.is_empty() {
            return Err(StoreError::invalid_argument("Key cannot be empty"));
        }
        // Legacy rule kept for compatibility with existing documents
        if key == EXAMPLE_KEY && !value.is_string() {
            return Err(StoreError::invalid_argument(format!(
                "Invalid type for key '{}': expected string, found {}",
                EXAMPLE_KEY,
                value.type_name()
            )));
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        state.entries.insert(key.to_string(), value);
        debug!("Set configuration key: {}", key);

        if let Some(stored) = state.entries.get(key) {
            let _dispatch = DispatchGuard::enter(self.id());
            for listener in &state.listeners {
                listener(key, stored);
            }
        }
        Ok(())
    }

    /// Snapshot of every entry
    pub fn get_all(&self) -> BTreeMap<String, ValueTree> {
        self.lock().entries.clone()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Remove a key
    ///
    /// A missing key is logged and returned as [`StoreError::KeyNotFound`];
    /// the store is unchanged in that case.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        match self.lock().entries.remove(key) {
            Some(_) => {
                debug!("Removed configuration key: {}", key);
                Ok(())
            }
            None => {
                warn!("Error in remove: Unknown configuration key: {}", key);
                Err(StoreError::key_not_found(key))
            }
        }
    }

    /// Remove every entry; listeners are kept
    pub fn clear(&self) {
        self.lock().entries.clear();
        debug!("Cleared configuration store");
    }

    /// Check values against predicates, in the order given
    ///
    /// Stops at the first key that is missing or whose predicate returns
    /// false. Predicates run under the store's lock and must not call back
    /// into this store.
    pub fn validate<I, K, P>(&self, validators: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (K, P)>,
        K: AsRef<str>,
        P: Fn(&ValueTree) -> bool,
    {
        let state = self.lock();
        let _dispatch = DispatchGuard::enter(self.id());
        for (key, predicate) in validators {
            let key = key.as_ref();
            let value = state
                .entries
                .get(key)
                .ok_or_else(|| StoreError::validation_failed(key, "Missing configuration key"))?;
            if !predicate(value) {
                return Err(StoreError::validation_failed(key, "Validation predicate rejected value"));
            }
        }
        Ok(())
    }

    /// Look up several keys, one lock acquisition per key
    ///
    /// Missing keys yield an empty mapping. Entries may change between two
    /// lookups, so the result is not an atomic snapshot.
    pub fn inspect<I, K>(&self, keys: I) -> Vec<ValueTree>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .map(|key| {
                self.get(key.as_ref())
                    .unwrap_or_else(|_| ValueTree::empty_mapping())
            })
            .collect()
    }

    /// Apply `set` to each pair in order
    ///
    /// Best-effort, not atomic: pairs before the first failure stay applied
    /// and the failure is returned.
    pub fn update_multiple<I, K, V>(&self, pairs: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ValueTree>,
    {
        for (key, value) in pairs {
            let key = key.as_ref();
            if let Err(e) = self.set(key, value) {
                warn!("Error in update_multiple at key '{}': {}", key, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Merge a JSON or YAML document, recording the default version
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let version = self.options.default_version.clone();
        self.load_from_file_with_version(path, &version)
    }

    /// Merge every top-level key of a JSON or YAML document into the store
    ///
    /// Matching keys are overwritten, other keys are left alone. Listeners
    /// are not notified.
    pub fn load_from_file_with_version(
        &self,
        path: impl AsRef<Path>,
        version: &str,
    ) -> StoreResult<()> {
        let path = path.as_ref();
        let format = reported("load_from_file", path, PersistFormat::from_path(path))?;

        let mut state = self.lock();
        let document = reported("load_from_file", path, persist::read_document(path, format))?;
        let count = document.len();
        for (key, value) in document {
            state.entries.insert(key, value);
        }
        state.version = version.to_string();

        info!(
            "Loaded {} configuration keys from {} (version {})",
            count,
            path.display(),
            version
        );
        Ok(())
    }

    /// Write every entry plus the default version tag
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        self.save_to_file_with_version(path, &self.options.default_version)
    }

    /// Write every entry plus a `version` field
    ///
    /// The version tag is written first. An entry literally named `version`
    /// collides with the tag and is not written.
    pub fn save_to_file_with_version(&self, path: impl AsRef<Path>, version: &str) -> StoreResult<()> {
        let path = path.as_ref();
        let format = reported("save_to_file", path, PersistFormat::from_path(path))?;

        let state = self.lock();
        let mut document = Mapping::with_capacity(state.entries.len() + 1);
        document.insert(VERSION_KEY, ValueTree::from(version));
        for (key, value) in &state.entries {
            if key == VERSION_KEY {
                warn!(
                    "Entry '{}' collides with the version tag and is not saved to {}",
                    VERSION_KEY,
                    path.display()
                );
                continue;
            }
            document.insert(key.clone(), value.clone());
        }

        reported(
            "save_to_file",
            path,
            persist::write_document(path, format, &document, self.options.json_indent),
        )?;
        info!(
            "Saved {} configuration keys to {} (version {})",
            state.entries.len(),
            path.display(),
            version
        );
        Ok(())
    }

    /// Load only the named keys from a document; absent keys are skipped
    pub fn load_partial_from_file<I, K>(&self, path: impl AsRef<Path>, keys: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let path = path.as_ref();
        let format = reported("load_partial_from_file", path, PersistFormat::from_path(path))?;

        let mut state = self.lock();
        let document = reported(
            "load_partial_from_file",
            path,
            persist::read_document(path, format),
        )?;
        let mut loaded = 0;
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = document.get(key) {
                state.entries.insert(key.to_string(), value.clone());
                loaded += 1;
            }
        }

        info!("Loaded {} partial configuration keys from {}", loaded, path.display());
        Ok(())
    }

    /// Save only the named keys; absent keys are omitted, no version is written
    pub fn save_partial_to_file<I, K>(&self, path: impl AsRef<Path>, keys: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let path = path.as_ref();
        let format = reported("save_partial_to_file", path, PersistFormat::from_path(path))?;

        let state = self.lock();
        let document: Mapping = keys
            .into_iter()
            .filter_map(|key| {
                let key = key.as_ref();
                state
                    .entries
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect();

        reported(
            "save_partial_to_file",
            path,
            persist::write_document(path, format, &document, self.options.json_indent),
        )?;
        info!(
            "Saved {} partial configuration keys to {}",
            document.len(),
            path.display()
        );
        Ok(())
    }

    /// Overlay the process environment, see [`ConfigStore::load_from_vars`]
    pub fn load_from_env(&self) {
        self.load_from_vars(std::env::vars_os().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (Err(raw), _) | (_, Err(raw)) => {
                    debug!("Skipping environment variable that is not UTF-8: {:?}", raw);
                    None
                }
            }
        }));
    }

    /// Overlay a list of `(name, value)` variables
    ///
    /// First every existing key with a variable of the same name is replaced by
    /// the variable's string and recorded in the override log. Then, unless
    /// `ingest_environment` is off, every variable becomes a string entry.
    /// Listeners are not notified.
    pub fn load_from_vars<I, K, V>(&self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let mut guard = self.lock();
        let state = &mut *guard;

        let mut overridden = 0;
        for (key, value) in state.entries.iter_mut() {
            if let Some(env_value) = vars.get(key) {
                *value = ValueTree::from(env_value.as_str());
                state.env_overrides.insert(key.clone(), env_value.clone());
                overridden += 1;
            }
        }

        if self.options.ingest_environment {
            for (name, value) in &vars {
                state
                    .entries
                    .insert(name.clone(), ValueTree::from(value.as_str()));
            }
        }

        info!(
            "Loaded environment overlay: {} overrides, {} variables",
            overridden,
            vars.len()
        );
    }

    /// Register a listener; listeners cannot be removed
    pub fn add_change_listener<F>(&self, listener: F)
    where
        F: Fn(&str, &ValueTree) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        state.listeners.push(Box::new(listener));
        debug!("Added change listener ({} total)", state.listeners.len());
    }

    /// Dump every entry as pretty JSON, without a version field
    ///
    /// Fails without writing when an entry holds a NaN or infinite float.
    pub fn backup_to_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let state = self.lock();
        let result = ensure_finite_entries(state.entries.iter().map(|(k, v)| (k.as_str(), v)))
            .and_then(|()| to_pretty_json(&state.entries, self.options.json_indent))
            .map_err(StoreError::from)
            .and_then(|content| {
                std::fs::write(path, content + "\n")
                    .map_err(|e| StoreError::io_error(path.to_path_buf(), IoOperation::Backup, e))
            });
        reported("backup_to_file", path, result)?;
        info!("Backed up {} configuration keys to {}", state.entries.len(), path.display());
        Ok(())
    }

    /// Print every entry to stdout
    pub fn display(&self) {
        let stdout = io::stdout();
        if let Err(e) = self.display_to(&mut stdout.lock()) {
            error!("Error in display: {}", e);
        }
    }

    /// Write `key: <pretty json>` for every entry
    pub fn display_to<W: Write + ?Sized>(&self, writer: &mut W) -> StoreResult<()> {
        let state = self.lock();
        for (key, value) in &state.entries {
            let pretty = to_pretty_json(value, self.options.json_indent)?;
            writeln!(writer, "{}: {}", key, pretty)
                .map_err(confstore_format::FormatError::from)?;
        }
        Ok(())
    }

    /// Render the store in the current output format
    pub fn output_config<W: Write + ?Sized>(&self, writer: &mut W) {
        self.output_config_as(get_output_format(), writer);
    }

    /// Render the store in the given format; failures are logged
    pub fn output_config_as<W: Write + ?Sized>(&self, format: OutputFormat, writer: &mut W) {
        let entries = self.get_all();
        if self.options.json_indent == DEFAULT_JSON_INDENT {
            default_factory().apply_output_format(writer, &entries, format);
        } else {
            SerializerFactory::with_json_indent(self.options.json_indent)
                .apply_output_format(writer, &entries, format);
        }
    }

    /// Version recorded by the last load
    pub fn version(&self) -> String {
        self.lock().version.clone()
    }

    /// Keys last overridden by the environment overlay, with their raw values
    pub fn env_overrides(&self) -> BTreeMap<String, String> {
        self.lock().env_overrides.clone()
    }

    /// Take over the contents of `other`
    ///
    /// Entries, listeners, version and override log move into `self`; `self`
    /// keeps its own lock and options and `other` is consumed.
    pub fn assign_from(&self, other: ConfigStore) {
        let incoming = other.state.into_inner();
        *self.lock() = incoming;
        debug!("Assigned configuration store contents");
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ConfigStore");
        match self.state.try_lock() {
            Some(state) => debug
                .field("entries", &state.entries)
                .field("listeners", &state.listeners.len())
                .field("version", &state.version)
                .field("env_overrides", &state.env_overrides),
            None => debug.field("state", &"<locked>"),
        };
        debug.field("options", &self.options).finish()
    }
}

/// Set the process-wide output format, then render `store` in it
pub fn set_format_and_output<W: Write + ?Sized>(
    format: OutputFormat,
    store: &ConfigStore,
    writer: &mut W,
) {
    set_output_format(format);
    store.output_config_as(format, writer);
}

fn reported<T>(operation: &str, path: &Path, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(e) = &result {
        error!("Error in {} ({}): {}", operation, path.display(), e);
    }
    result
}
