//! Configuration for model artifacts and the stopword corpus

use reviewcheck_core::{Error, ModelKey, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for all classifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Directory that relative artifact paths are resolved against
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Artifact path per model key
    #[serde(default = "default_models")]
    pub models: BTreeMap<ModelKey, PathBuf>,

    /// NLTK data directories searched for the stopword corpus, in order
    #[serde(default = "default_nltk_data")]
    pub nltk_data: Vec<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            models: default_models(),
            nltk_data: default_nltk_data(),
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Resolved artifact path for `key`, if configured
    pub fn artifact_path(&self, key: ModelKey) -> Option<PathBuf> {
        let path = self.models.get(&key)?;
        if path.is_absolute() {
            Some(path.clone())
        } else {
            Some(self.models_dir.join(path))
        }
    }

    /// Every configured `(key, resolved path)` pair in canonical key order
    pub fn artifacts(&self) -> Vec<(ModelKey, PathBuf)> {
        self.models
            .keys()
            .filter_map(|key| self.artifact_path(*key).map(|p| (*key, p)))
            .collect()
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_models() -> BTreeMap<ModelKey, PathBuf> {
    ModelKey::ALL
        .into_iter()
        .map(|key| (key, PathBuf::from(key.default_artifact())))
        .collect()
}

fn default_nltk_data() -> Vec<PathBuf> {
    vec![PathBuf::from("./nltk_data")]
}
