//! Named factory registries
//!
//! A [`Registry`] is a named table mapping string identifiers to factories
//! that construct one category of object (models, datasets, optimizers).
//! Each category owns its own registry value; registries are passed by
//! reference wherever construction happens, with no process-global table.
//! Registration is always an explicit call at startup, so the set of
//! constructible types is visible in one place.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::build::{build_from_config, BuildError};
use crate::record::ConfigRecord;

/// A shared factory producing `T` from the non-`type` fields of a record.
pub type Factory<T> = Arc<dyn Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync>;

/// A registry-level build function; [`Registry::build`] delegates to it.
pub type BuildFn<T> = Arc<
    dyn Fn(ConfigRecord, &Registry<T>, Option<&ConfigRecord>) -> Result<T, BuildError>
        + Send
        + Sync,
>;

/// Errors raised during registration and lookup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The name is taken and `force` was not used.
    #[error("'{name}' is already registered in the '{registry}' registry")]
    Duplicate { name: String, registry: String },

    /// No factory is registered under the key.
    #[error("'{key}' is not registered in the '{registry}' registry")]
    NotFound { key: String, registry: String },
}

/// A named table of factories for one category of constructible object.
pub struct Registry<T> {
    name: String,
    entries: HashMap<String, Factory<T>>,
    build_fn: BuildFn<T>,
}

impl<T> Registry<T> {
    /// Create an empty registry that builds via [`build_from_config`].
    pub fn new(name: impl Into<String>) -> Self
    where
        T: 'static,
    {
        Self::with_builder(name, build_from_config)
    }

    /// Create an empty registry with a custom build function.
    ///
    /// The build function runs on every [`Registry::build`] call and
    /// receives the record, the registry itself, and the optional defaults.
    /// A category can use it to wrap or post-process every instance it
    /// constructs.
    pub fn with_builder<F>(name: impl Into<String>, build_fn: F) -> Self
    where
        F: Fn(ConfigRecord, &Registry<T>, Option<&ConfigRecord>) -> Result<T, BuildError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            build_fn: Arc::new(build_fn),
        }
    }

    /// The registry's identifying name, as used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a factory under `name`.
    ///
    /// Registering a taken name fails with [`RegistryError::Duplicate`]; a
    /// collision means two components claim the same config identifier, and
    /// that has to surface at startup rather than silently shadow one of
    /// them. Use [`Registry::register_force`] to replace deliberately.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RegistryError::Duplicate {
                name,
                registry: self.name.clone(),
            });
        }
        debug!("registered '{}' in the '{}' registry", name, self.name);
        self.entries.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Register a factory under `name`, replacing any existing entry.
    pub fn register_force<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.entries.insert(name.clone(), Arc::new(factory)).is_some() {
            debug!("replaced '{}' in the '{}' registry", name, self.name);
        } else {
            debug!("registered '{}' in the '{}' registry", name, self.name);
        }
    }

    /// Register one factory under every name in `names`.
    ///
    /// All names resolve to the same shared factory. Registration is
    /// all-or-nothing: if any name is taken (or repeated in `names`),
    /// nothing is inserted.
    pub fn register_aliases<I, S, F>(&mut self, names: I, factory: F) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync + 'static,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if self.entries.contains_key(name) || !seen.insert(name.as_str()) {
                return Err(RegistryError::Duplicate {
                    name: name.clone(),
                    registry: self.name.clone(),
                });
            }
        }
        let factory: Factory<T> = Arc::new(factory);
        for name in names {
            debug!("registered '{}' in the '{}' registry", name, self.name);
            self.entries.insert(name, Arc::clone(&factory));
        }
        Ok(())
    }

    /// Look up a factory by key.
    ///
    /// The key may carry a scope prefix (`"vision.ResNet"`); the scope is
    /// parsed off and ignored, and resolution proceeds on the remainder
    /// against this registry's table. Scoped dispatch across registries is
    /// reserved for a future extension, so a scoped key never means
    /// something different from its unscoped remainder today.
    pub fn lookup(&self, key: &str) -> Result<Factory<T>, RegistryError> {
        let (_scope, local_key) = split_scope_key(key);
        self.entries
            .get(local_key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                key: key.to_string(),
                registry: self.name.clone(),
            })
    }

    /// Whether `name` is registered, without scope stripping.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered names (aliases count individually).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// One-line description of the registry and its table, for logs.
    pub fn describe(&self) -> String {
        format!(
            "Registry(name={}, entries=[{}])",
            self.name,
            self.names().join(", ")
        )
    }

    /// Build an instance from `config` via this registry's build function.
    pub fn build(&self, config: ConfigRecord) -> Result<T, BuildError> {
        (self.build_fn)(config, self, None)
    }

    /// Build an instance, filling keys absent from `config` from `defaults`.
    pub fn build_with_defaults(
        &self,
        config: ConfigRecord,
        defaults: &ConfigRecord,
    ) -> Result<T, BuildError> {
        (self.build_fn)(config, self, Some(defaults))
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("entries", &self.names())
            .finish()
    }
}

/// Split a key into an optional scope prefix and the local remainder.
///
/// The split happens at the first `.`: `"vision.ResNet"` parses to
/// `(Some("vision"), "ResNet")` and `"a.b.c"` to `(Some("a"), "b.c")`.
/// A key without a `.` has no scope.
pub fn split_scope_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('.') {
        Some((scope, local_key)) => (Some(scope), local_key),
        None => (None, key),
    }
}
