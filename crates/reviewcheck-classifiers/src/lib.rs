//! reviewcheck Classifiers
//!
//! Loads pre-trained fake-review classifiers and runs them on raw text.
//!
//! Each artifact is a JSON document describing a fitted text pipeline:
//! - a bag-of-words vocabulary with optional TF-IDF weighting
//! - one estimator: logistic regression, linear SVC (Platt-scaled), or a
//!   random forest
//!
//! Every pipeline shares one [`TextNormalizer`], which reproduces the
//! tokenization the models were trained on.

pub mod classifier;
pub mod config;
pub mod estimator;
pub mod forest;
pub mod linear_svc;
pub mod logistic;
pub mod model_loader;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod vectorizer;

pub use classifier::{ClassificationResult, Classifier};
pub use config::ClassifierConfig;
pub use model_loader::{load_artifact, ArtifactSpec, EstimatorSpec, ARTIFACT_FORMAT_VERSION};
pub use normalize::{StopwordCorpus, TextNormalizer, STOPWORDS_RELATIVE_PATH};
pub use pipeline::TextPipeline;
pub use registry::{
    init_registry_from_config, init_registry_from_file, load_config, ModelRegistry,
    ModelRegistryBuilder,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::config::ClassifierConfig;
    pub use crate::registry::{ModelRegistry, ModelRegistryBuilder};
}
