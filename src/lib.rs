//! Config-driven factory registries for experiment pipelines
//!
//! This crate implements the configuration layer of an experiment pipeline:
//! nested config records loaded from YAML, TOML, or JSON, deep-merged with
//! override semantics, and turned into live objects by named registries.
//! A record's reserved `type` field selects a registered factory; every
//! other field becomes a constructor argument, so configs declare *what*
//! to build and registries hold *how*.

pub mod build;
pub mod document;
pub mod merge;
pub mod record;
pub mod registry;

pub use build::{build_from_config, from_params, try_from_params, BuildError};
pub use document::{from_json_str, from_toml_str, from_yaml_str, load_record, DocumentError};
pub use merge::{deep_merge, lift_subconfig, MergeError};
pub use record::{
    ensure_complete, placeholder_paths, type_name, ConfigRecord, RecordError, PLACEHOLDER,
    TYPE_KEY,
};
pub use registry::{split_scope_key, BuildFn, Factory, Registry, RegistryError};
