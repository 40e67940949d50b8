//! File-backed store of named custom processor scripts
//!
//! Layout under the configuration directory:
//!
//! ```text
//! conf/
//!   custom_processors/<slug>.json   one {"name", "script"} object per file
//!   custom_processors.json          legacy {"processors": [...]}, read once then migrated
//! ```

use super::write_atomic;
use crate::core::StepConfig;
use crate::error::{ConfigError, StoreError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Sub-directory holding one file per definition
pub const PROCESSORS_DIR: &str = "custom_processors";

/// Single-file format used by older versions
pub const LEGACY_FILE: &str = "custom_processors.json";

/// A named custom processor script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProcessorDefinition {
    pub name: String,
    pub script: String,
}

impl CustomProcessorDefinition {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.script.is_empty() {
            return Err(ConfigError::EmptyScript);
        }
        Ok(())
    }

    /// File stem this definition is stored under
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Configuration of a pipeline step running this script
    pub fn to_step_config(&self) -> StepConfig {
        StepConfig::custom_script(self.name.clone(), self.script.clone())
    }
}

#[derive(Deserialize)]
struct LegacyPayload {
    #[serde(default)]
    processors: Vec<CustomProcessorDefinition>,
}

/// Filesystem-safe storage key for a processor name.
///
/// Trimmed and lowercased; every run of characters outside `[a-z0-9-_]`
/// becomes a single `-`. An empty result becomes `custom`.
pub fn slugify(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_run = UNSAFE.get_or_init(|| Regex::new(r"[^a-z0-9\-_]+").expect("valid slug regex"));

    let lowered = name.trim().to_lowercase();
    let slug = unsafe_run.replace_all(&lowered, "-");
    if slug.is_empty() {
        "custom".to_string()
    } else {
        slug.into_owned()
    }
}

/// Handle returned by [`CustomProcessorStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener notified with the current definitions after each change
pub type UpdateCallback = Box<dyn Fn(&[CustomProcessorDefinition]) + Send>;

/// Owns the in-memory definitions and keeps them in sync with disk.
///
/// Every mutation persists immediately and then notifies subscribers. If the
/// save fails the error is returned, subscribers are not notified, and the
/// in-memory change stays in place.
pub struct CustomProcessorStore {
    conf_dir: PathBuf,
    definitions: Vec<CustomProcessorDefinition>,
    subscribers: Vec<(SubscriptionId, UpdateCallback)>,
    next_subscription: u64,
}

impl fmt::Debug for CustomProcessorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomProcessorStore")
            .field("conf_dir", &self.conf_dir)
            .field("definitions", &self.definitions)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CustomProcessorStore {
    /// Empty store rooted at `conf_dir`; nothing is read until [`load_all`](Self::load_all)
    pub fn new(conf_dir: impl Into<PathBuf>) -> Self {
        Self {
            conf_dir: conf_dir.into(),
            definitions: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store and load whatever is on disk
    pub fn open(conf_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(conf_dir);
        store.load_all()?;
        Ok(store)
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    pub fn processors_dir(&self) -> PathBuf {
        self.conf_dir.join(PROCESSORS_DIR)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.conf_dir.join(LEGACY_FILE)
    }

    fn definition_path(&self, slug: &str) -> PathBuf {
        self.processors_dir().join(format!("{}.json", slug))
    }

    /// Load every definition from disk, migrating the legacy file if the
    /// directory has none. Returns the number of definitions loaded.
    pub fn load_all(&mut self) -> Result<usize, StoreError> {
        let mut definitions = self.read_directory()?;

        if definitions.is_empty() {
            let legacy = self.read_legacy()?;
            if !legacy.is_empty() {
                info!(
                    "Migrating {} custom processors from {}",
                    legacy.len(),
                    self.legacy_path().display()
                );
                self.definitions = legacy;
                self.save_all()?;
                definitions = std::mem::take(&mut self.definitions);
            }
        }

        info!("Loaded {} custom processors from {}", definitions.len(), self.conf_dir.display());
        self.definitions = definitions;
        self.notify();
        Ok(self.definitions.len())
    }

    fn read_directory(&self) -> Result<Vec<CustomProcessorDefinition>, StoreError> {
        let dir = self.processors_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(cause) => return Err(StoreError::Io { path: dir, cause }),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_json_extension(path))
            .collect();
        paths.sort();

        let mut definitions = Vec::with_capacity(paths.len());
        for path in paths {
            match read_definition(&path) {
                Ok(def) => definitions.push(def),
                Err(reason) => warn!("Skipping {}: {}", path.display(), reason),
            }
        }
        Ok(definitions)
    }

    fn read_legacy(&self) -> Result<Vec<CustomProcessorDefinition>, StoreError> {
        let path = self.legacy_path();
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(cause) => return Err(StoreError::Io { path, cause }),
        };

        match serde_json::from_str::<LegacyPayload>(&data) {
            Ok(payload) => Ok(payload
                .processors
                .into_iter()
                .filter(|def| def.validate().is_ok())
                .collect()),
            Err(e) => {
                warn!("Ignoring malformed {}: {}", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    /// Write every definition to `<slug>.json`. Files of definitions that no
    /// longer exist are left alone.
    pub fn save_all(&self) -> Result<(), StoreError> {
        let dir = self.processors_dir();
        std::fs::create_dir_all(&dir).map_err(|cause| StoreError::Io {
            path: dir.clone(),
            cause,
        })?;

        let mut written: HashMap<String, &str> = HashMap::new();
        for def in &self.definitions {
            let slug = def.slug();
            if let Some(previous) = written.insert(slug.clone(), &def.name) {
                warn!(
                    "Custom processors '{}' and '{}' share the file {}.json; '{}' overwrites it",
                    previous, def.name, slug, def.name
                );
            }

            let path = self.definition_path(&slug);
            let json = serde_json::to_string_pretty(def).map_err(|cause| StoreError::Encode {
                path: path.clone(),
                cause,
            })?;
            write_atomic(&path, json.as_bytes()).map_err(|cause| StoreError::Io { path, cause })?;
        }

        debug!("Saved {} custom processors to {}", self.definitions.len(), dir.display());
        Ok(())
    }

    pub fn add_processor(&mut self, name: impl Into<String>, script: impl Into<String>) -> Result<(), StoreError> {
        let def = CustomProcessorDefinition::new(name, script);
        def.validate()?;
        info!("Adding custom processor '{}'", def.name);
        self.definitions.push(def);
        self.commit(None)
    }

    /// Remove and return the definition at `index`
    pub fn remove_processor(&mut self, index: usize) -> Result<CustomProcessorDefinition, StoreError> {
        self.check_index(index)?;
        let removed = self.definitions.remove(index);
        info!("Removing custom processor '{}'", removed.name);
        self.commit(Some(removed.slug()))?;
        Ok(removed)
    }

    pub fn rename_processor(&mut self, index: usize, name: impl Into<String>) -> Result<(), StoreError> {
        self.check_index(index)?;
        let script = self.definitions[index].script.clone();
        self.edit_processor(index, name, script)
    }

    /// Replace both the name and the script of the definition at `index`
    pub fn edit_processor(
        &mut self,
        index: usize,
        name: impl Into<String>,
        script: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.check_index(index)?;
        let updated = CustomProcessorDefinition::new(name, script);
        updated.validate()?;

        let old_slug = self.definitions[index].slug();
        info!("Updating custom processor '{}'", self.definitions[index].name);
        self.definitions[index] = updated;
        self.commit(Some(old_slug))
    }

    /// Persist, drop the file of `stale_slug` if nothing maps to it anymore,
    /// then notify subscribers.
    fn commit(&mut self, stale_slug: Option<String>) -> Result<(), StoreError> {
        self.save_all()?;
        if let Some(slug) = stale_slug {
            self.remove_orphan(&slug)?;
        }
        self.notify();
        Ok(())
    }

    fn remove_orphan(&self, slug: &str) -> Result<(), StoreError> {
        if self.definitions.iter().any(|def| def.slug() == slug) {
            return Ok(());
        }
        let path = self.definition_path(slug);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(cause) => Err(StoreError::Io { path, cause }),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.definitions.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.definitions.len(),
            })
        }
    }

    /// Copies of all definitions, in store order
    pub fn processors(&self) -> Vec<CustomProcessorDefinition> {
        self.definitions.clone()
    }

    pub fn get(&self, index: usize) -> Option<CustomProcessorDefinition> {
        self.definitions.get(index).cloned()
    }

    /// First definition with exactly this name
    pub fn find(&self, name: &str) -> Option<CustomProcessorDefinition> {
        self.definitions.iter().find(|def| def.name == name).cloned()
    }

    /// Index of the first definition with exactly this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|def| def.name == name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Register a listener called after every successful change
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[CustomProcessorDefinition]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Subscribe without keeping the handle
    pub fn register_update_callback<F>(&mut self, callback: F)
    where
        F: Fn(&[CustomProcessorDefinition]) + Send + 'static,
    {
        self.subscribe(callback);
    }

    fn notify(&self) {
        for (_, listener) in &self.subscribers {
            listener(&self.definitions);
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_definition(path: &Path) -> Result<CustomProcessorDefinition, String> {
    let data = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let def: CustomProcessorDefinition = serde_json::from_str(&data).map_err(|e| e.to_string())?;
    def.validate().map_err(|e| e.to_string())?;
    Ok(def)
}
