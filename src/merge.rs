//! Configuration merge logic
//!
//! Implements record merging with:
//! - Mappings: deep-merge by key
//! - Sequences: REPLACE (overlay wins)
//! - Scalars: override (overlay wins)
//!
//! Also implements the sub-config lift, the pattern behind "one document,
//! many experiment variants": a nested block is pulled out of a record and
//! merged over the rest of it.

use serde_json::map::Entry;
use serde_json::Value;
use tracing::{debug, trace};

use crate::record::ConfigRecord;

/// Errors raised while merging configuration records.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A nested overlay mapping landed on a base value that is not a mapping.
    #[error("cannot merge nested mapping into non-mapping value at '{path}'")]
    KeyConflict { path: String },

    /// The named sub-config is absent from the record.
    #[error("sub-config '{parameter}' not found in config")]
    MissingSubConfig { parameter: String },

    /// The named sub-config is present but is not a mapping.
    #[error("sub-config '{parameter}' is not a mapping")]
    SubConfigNotAMapping { parameter: String },
}

/// Deep merge two configuration records.
///
/// Merge semantics:
/// - Mappings: deep-merge by key (recursive)
/// - Sequences: REPLACE (overlay wins entirely)
/// - Scalars: override (overlay wins; null overrides any value)
/// - An overlay mapping with no base counterpart is inserted wholesale; an
///   overlay mapping over a base scalar or sequence is a
///   [`MergeError::KeyConflict`] naming the dotted path of the clash.
pub fn deep_merge(
    base: ConfigRecord,
    overlay: ConfigRecord,
) -> Result<ConfigRecord, MergeError> {
    let mut merged = base;
    merge_record(&mut merged, overlay, "")?;
    Ok(merged)
}

fn merge_record(
    base: &mut ConfigRecord,
    overlay: ConfigRecord,
    prefix: &str,
) -> Result<(), MergeError> {
    for (key, overlay_value) in overlay {
        let path = join_path(prefix, &key);
        match overlay_value {
            Value::Object(nested) => match base.entry(key) {
                // No base counterpart: take the overlay subtree as-is
                Entry::Vacant(slot) => {
                    trace!("merge: inserted subtree at '{}'", path);
                    slot.insert(Value::Object(nested));
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Value::Object(base_nested) => merge_record(base_nested, nested, &path)?,
                    _ => return Err(MergeError::KeyConflict { path }),
                },
            },
            // Scalars, sequences, null: overlay wins
            overlay_value => {
                trace!("merge: overrode '{}'", path);
                base.insert(key, overlay_value);
            }
        }
    }
    Ok(())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Pull `config[parameter]` out as an overlay and deep-merge it over the
/// remaining record.
///
/// This is how one document carries several experiment variants: shared
/// settings live at the top level, each variant is a nested block, and
/// lifting a block produces the effective config for that variant.
pub fn lift_subconfig(
    parameter: &str,
    config: ConfigRecord,
) -> Result<ConfigRecord, MergeError> {
    let mut base = config;
    let overlay = match base.remove(parameter) {
        Some(Value::Object(overlay)) => overlay,
        Some(_) => {
            return Err(MergeError::SubConfigNotAMapping {
                parameter: parameter.to_string(),
            })
        }
        None => {
            return Err(MergeError::MissingSubConfig {
                parameter: parameter.to_string(),
            })
        }
    };
    debug!(
        "lifting sub-config '{}' over {} top-level keys",
        parameter,
        base.len()
    );
    deep_merge(base, overlay)
}
