//! Config-driven construction
//!
//! [`build_from_config`] turns a configuration record into a live instance:
//! the record's reserved `type` field names a factory in a [`Registry`],
//! and every remaining field becomes a constructor argument. Experiment
//! configs thereby select among interchangeable implementations by data
//! alone; calling code never branches on what it is building.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::record::{ConfigRecord, TYPE_KEY};
use crate::registry::{Registry, RegistryError};

/// Errors raised while building from a configuration record.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Neither the record nor the defaults declare a `type`.
    #[error("config must contain a 'type' field, either directly or via defaults")]
    MissingType,

    /// The `type` field is present but is not a string.
    #[error("'type' must be a string, found {found}")]
    InvalidType { found: Value },

    /// The declared type has no factory in the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The record's fields do not match the factory's parameters.
    #[error("invalid constructor arguments: {0}")]
    Arguments(#[from] serde_json::Error),

    /// The factory itself failed to construct the instance.
    #[error("construction failed: {0}")]
    Construction(String),
}

/// Build an instance of `T` from a configuration record.
///
/// The `type` discriminator is taken from the record itself, falling back
/// to `defaults`. Every defaults key absent from the record is filled in
/// first, so defaults never override an explicit value. The resolved
/// factory receives all remaining fields; whatever error it returns
/// propagates unmodified.
pub fn build_from_config<T>(
    config: ConfigRecord,
    registry: &Registry<T>,
    defaults: Option<&ConfigRecord>,
) -> Result<T, BuildError> {
    let mut args = config;
    if let Some(defaults) = defaults {
        for (key, value) in defaults {
            if !args.contains_key(key) {
                args.insert(key.clone(), value.clone());
            }
        }
    }

    let type_name = match args.remove(TYPE_KEY) {
        Some(Value::String(name)) => name,
        Some(found) => return Err(BuildError::InvalidType { found }),
        None => return Err(BuildError::MissingType),
    };

    debug!(
        "building '{}' from the '{}' registry with {} argument(s)",
        type_name,
        registry.name(),
        args.len()
    );

    let factory = registry.lookup(&type_name)?;
    factory(args)
}

/// Adapt an infallible typed constructor into a factory.
///
/// The record is deserialized into the parameter struct `P`, then handed to
/// `ctor`. A record the struct cannot absorb fails with
/// [`BuildError::Arguments`]; whether surplus keys are tolerated is the
/// struct's own serde choice (`#[serde(deny_unknown_fields)]` rejects
/// them).
pub fn from_params<P, T, F>(
    ctor: F,
) -> impl Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync + 'static
where
    P: DeserializeOwned + 'static,
    T: 'static,
    F: Fn(P) -> T + Send + Sync + 'static,
{
    move |args| {
        let params: P = serde_json::from_value(Value::Object(args))?;
        Ok(ctor(params))
    }
}

/// Adapt a fallible typed constructor into a factory.
///
/// Like [`from_params`], but `ctor` may reject the parameters after
/// deserialization, typically with [`BuildError::Construction`].
pub fn try_from_params<P, T, F>(
    ctor: F,
) -> impl Fn(ConfigRecord) -> Result<T, BuildError> + Send + Sync + 'static
where
    P: DeserializeOwned + 'static,
    T: 'static,
    F: Fn(P) -> Result<T, BuildError> + Send + Sync + 'static,
{
    move |args| {
        let params: P = serde_json::from_value(Value::Object(args))?;
        ctor(params)
    }
}
