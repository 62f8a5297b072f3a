//! Test fixtures for registry-driven construction
//!
//! This module provides:
//! - Committed experiment config documents (tests/fixtures/*.yaml)
//! - A small model/dataset domain with typed parameter structs
//! - Registry builders shared across the integration tests

use std::path::{Path, PathBuf};

use config_registry::{from_params, try_from_params, BuildError, ConfigRecord, Registry};
use serde::Deserialize;
use serde_json::Value;

/// Path to the shared experiment config fixture
pub fn experiment_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/experiment.yaml")
}

/// Path to the scaffolded config fixture with unfilled placeholders
pub fn scaffold_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scaffold.yaml")
}

/// Clone a nested block of a record as its own record
pub fn section(record: &ConfigRecord, key: &str) -> ConfigRecord {
    record
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(|| panic!("fixture record has no '{}' mapping", key))
}

/// Parameters of the linear model fixture
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearParams {
    pub inputs: u32,
    pub outputs: u32,
    #[serde(default)]
    pub bias: bool,
}

/// Parameters of the MLP fixture
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MlpParams {
    pub inputs: u32,
    pub outputs: u32,
    pub hidden: Vec<u32>,
}

/// Models constructible from the `models` registry
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Linear(LinearParams),
    Mlp(MlpParams),
}

/// Parameters of the in-memory dataset fixture
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InMemoryParams {
    pub samples: u32,
    pub batch_size: u32,
}

/// Parameters of the CSV dataset fixture
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvFileParams {
    pub path: String,
}

/// Datasets constructible from the `datasets` registry
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    InMemory(InMemoryParams),
    CsvFile(CsvFileParams),
}

/// Registry with both model fixtures; the MLP is registered under an alias
/// as well as its primary name
pub fn model_registry() -> Registry<Model> {
    let mut registry = Registry::new("models");
    registry
        .register("LinearModel", from_params(Model::Linear))
        .expect("fresh registry");
    registry
        .register_aliases(["MlpModel", "FeedForward"], from_params(Model::Mlp))
        .expect("fresh registry");
    registry
}

/// Registry with both dataset fixtures; the CSV factory validates its path
pub fn dataset_registry() -> Registry<Dataset> {
    let mut registry = Registry::new("datasets");
    registry
        .register("InMemory", from_params(Dataset::InMemory))
        .expect("fresh registry");
    registry
        .register(
            "CsvFile",
            try_from_params(|params: CsvFileParams| {
                if params.path.is_empty() {
                    return Err(BuildError::Construction(
                        "path must not be empty".to_string(),
                    ));
                }
                Ok(Dataset::CsvFile(params))
            }),
        )
        .expect("fresh registry");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_documents_exist() {
        assert!(experiment_config_path().exists());
        assert!(scaffold_config_path().exists());
    }

    #[test]
    fn test_model_registry_names() {
        let models = model_registry();
        assert_eq!(
            models.names(),
            vec!["FeedForward", "LinearModel", "MlpModel"]
        );
    }

    #[test]
    fn test_dataset_registry_names() {
        let datasets = dataset_registry();
        assert_eq!(datasets.names(), vec!["CsvFile", "InMemory"]);
    }
}
