//! Model registry initialization and lookup

use crate::config::ClassifierConfig;
use crate::model_loader::load_artifact;
use crate::normalize::TextNormalizer;
use crate::Classifier;
use reviewcheck_core::{ModelKey, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Immutable mapping from model key to loaded classifier.
///
/// Built once through [`ModelRegistryBuilder`]; a key is present only if
/// its classifier loaded successfully.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelKey, Arc<dyn Classifier>>,
}

impl ModelRegistry {
    /// Start building a registry
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Get a classifier by key
    pub fn get(&self, key: ModelKey) -> Option<&Arc<dyn Classifier>> {
        self.models.get(&key)
    }

    /// Resolve a raw form value. Unknown keys and keys whose artifact did
    /// not load both resolve to `None`.
    pub fn lookup(&self, raw: &str) -> Option<(ModelKey, &Arc<dyn Classifier>)> {
        let key = raw.parse::<ModelKey>().ok()?;
        self.get(key).map(|classifier| (key, classifier))
    }

    /// Check if a model is registered
    pub fn has_model(&self, key: ModelKey) -> bool {
        self.models.contains_key(&key)
    }

    /// Loaded keys in canonical order
    pub fn keys(&self) -> Vec<ModelKey> {
        self.models.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.models.iter().map(|(k, c)| (k.as_str(), c.name())))
            .finish()
    }
}

/// Collects classifiers before freezing them into a [`ModelRegistry`]
#[derive(Default)]
pub struct ModelRegistryBuilder {
    models: BTreeMap<ModelKey, Arc<dyn Classifier>>,
}

impl ModelRegistryBuilder {
    /// Register a classifier, replacing any previous one for `key`
    pub fn register(mut self, key: ModelKey, classifier: Arc<dyn Classifier>) -> Self {
        self.insert(key, classifier);
        self
    }

    pub fn insert(&mut self, key: ModelKey, classifier: Arc<dyn Classifier>) {
        self.models.insert(key, classifier);
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            models: self.models,
        }
    }
}

/// Load every configured artifact. Failures are logged and the key is
/// left out; this never fails as a whole.
pub fn init_registry_from_config(config: &ClassifierConfig) -> ModelRegistry {
    let normalizer = Arc::new(TextNormalizer::from_search_path(&config.nltk_data));
    let artifacts = config.artifacts();

    info!("Initializing model registry with {} models", artifacts.len());

    let mut builder = ModelRegistry::builder();
    for (key, path) in &artifacts {
        match load_artifact(path, Arc::clone(&normalizer)) {
            Ok(pipeline) => {
                info!(
                    "✓ Loaded model {} from {} ({}, {} features)",
                    key,
                    path.display(),
                    pipeline.estimator_kind(),
                    pipeline.n_features()
                );
                builder.insert(*key, Arc::new(pipeline));
            }
            Err(e) => {
                warn!("✗ Failed to load model {}: {}", key, e);
                // Continue with other models rather than failing completely
            }
        }
    }

    let registry = builder.build();
    info!(
        "Model registry initialized with {}/{} models",
        registry.len(),
        artifacts.len()
    );

    registry
}

/// Load classifier configuration from file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClassifierConfig> {
    ClassifierConfig::from_file(path)
}

/// Initialize registry from config file
pub fn init_registry_from_file(path: impl AsRef<Path>) -> Result<ModelRegistry> {
    let config = load_config(path)?;
    Ok(init_registry_from_config(&config))
}
