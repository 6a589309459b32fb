//! Artifact loading: JSON model files into validated pipelines

use crate::estimator::Estimator;
use crate::forest::{RandomForest, TreeSpec};
use crate::linear_svc::LinearSvc;
use crate::logistic::LogisticRegression;
use crate::normalize::TextNormalizer;
use crate::pipeline::TextPipeline;
use crate::vectorizer::{TfidfVectorizer, VectorizerSpec};
use reviewcheck_core::{Error, Label, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Artifact schema version understood by this loader
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// On-disk model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub format_version: u32,

    /// Display name; defaults to the file stem
    #[serde(default)]
    pub name: Option<String>,

    /// Class labels, in the estimator's output order
    pub classes: Vec<Label>,

    pub vectorizer: VectorizerSpec,

    pub estimator: EstimatorSpec,
}

/// Estimator section of a model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
    },
    LinearSvc {
        coef: Vec<f64>,
        intercept: f64,
        platt_a: f64,
        platt_b: f64,
    },
    RandomForest {
        trees: Vec<TreeSpec>,
    },
}

impl ArtifactSpec {
    /// Parse an artifact document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::artifact(format!("invalid artifact: {e}")))
    }

    /// Validate and assemble into a pipeline
    pub fn into_pipeline(
        self,
        default_name: &str,
        normalizer: Arc<TextNormalizer>,
    ) -> Result<TextPipeline> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(Error::artifact(format!(
                "unsupported artifact format_version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        if self.classes.len() != 2 || self.classes[0] == self.classes[1] {
            return Err(Error::artifact(format!(
                "expected two distinct classes, got {:?}",
                self.classes
            )));
        }

        let vectorizer = TfidfVectorizer::from_spec(self.vectorizer)?;
        let n_features = vectorizer.n_features();
        let n_classes = self.classes.len();

        let estimator: Box<dyn Estimator> = match self.estimator {
            EstimatorSpec::LogisticRegression { coef, intercept } => {
                Box::new(LogisticRegression::new(coef, intercept, n_features)?)
            }
            EstimatorSpec::LinearSvc {
                coef,
                intercept,
                platt_a,
                platt_b,
            } => Box::new(LinearSvc::new(coef, intercept, platt_a, platt_b, n_features)?),
            EstimatorSpec::RandomForest { trees } => {
                Box::new(RandomForest::new(trees, n_features, n_classes)?)
            }
        };

        let name = self.name.unwrap_or_else(|| default_name.to_string());
        Ok(TextPipeline::new(
            name,
            self.classes,
            normalizer,
            vectorizer,
            estimator,
        ))
    }
}

/// Read, parse, and validate an artifact file
pub fn load_artifact(path: impl AsRef<Path>, normalizer: Arc<TextNormalizer>) -> Result<TextPipeline> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::artifact(format!("{} file not found", path.display())));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::artifact(format!("failed to read {}: {e}", path.display())))?;
    let spec = ArtifactSpec::from_json(&content)
        .map_err(|e| Error::artifact(format!("{}: {e}", path.display())))?;

    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");

    spec.into_pipeline(default_name, normalizer)
        .map_err(|e| Error::artifact(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::normalize::StopwordCorpus;

    fn normalizer() -> Arc<TextNormalizer> {
        Arc::new(TextNormalizer::new(StopwordCorpus::parse("the\n", "inline")))
    }

    const LR_ARTIFACT: &str = r#"{
        "format_version": 1,
        "classes": ["CG", "OR"],
        "vectorizer": { "vocabulary": { "bot": 0, "love": 1 }, "idf": [1.5, 1.0] },
        "estimator": { "kind": "logistic_regression", "coef": [-3.0, 2.0], "intercept": 0.25 }
    }"#;

    #[test]
    fn test_parse_logistic_artifact() {
        let spec = ArtifactSpec::from_json(LR_ARTIFACT).unwrap();
        let pipeline = spec.into_pipeline("lr_model", normalizer()).unwrap();

        assert_eq!(pipeline.name(), "lr_model");
        assert_eq!(pipeline.estimator_kind(), "logistic_regression");
        assert_eq!(pipeline.classes(), &[Label::ComputerGenerated, Label::Original]);
        assert_eq!(pipeline.predict("the bot").unwrap(), Label::ComputerGenerated);
        assert_eq!(pipeline.predict("love").unwrap(), Label::Original);
    }

    #[test]
    fn test_rejects_unknown_label() {
        let json = LR_ARTIFACT.replace(r#"["CG", "OR"]"#, r#"["CG", "XX"]"#);
        assert!(ArtifactSpec::from_json(&json).is_err());
    }

    #[test]
    fn test_rejects_duplicate_classes() {
        let json = LR_ARTIFACT.replace(r#"["CG", "OR"]"#, r#"["OR", "OR"]"#);
        let spec = ArtifactSpec::from_json(&json).unwrap();
        assert!(spec.into_pipeline("x", normalizer()).is_err());
    }

    #[test]
    fn test_rejects_version_and_dimension_mismatch() {
        let json = LR_ARTIFACT.replace(r#""format_version": 1"#, r#""format_version": 2"#);
        let spec = ArtifactSpec::from_json(&json).unwrap();
        assert!(spec.into_pipeline("x", normalizer()).is_err());

        let json = LR_ARTIFACT.replace("[-3.0, 2.0]", "[-3.0]");
        let spec = ArtifactSpec::from_json(&json).unwrap();
        let err = spec.into_pipeline("x", normalizer()).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_artifact("/nonexistent/rf_model.json", normalizer()).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
        assert!(err.to_string().contains("rf_model.json file not found"));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svc_model.json");
        std::fs::write(&path, b"\x80\x04 not json").unwrap();
        assert!(load_artifact(&path, normalizer()).is_err());
    }
}
