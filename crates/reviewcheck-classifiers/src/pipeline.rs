//! Text classification pipeline: normalize, vectorize, estimate

use crate::classifier::Classifier;
use crate::estimator::Estimator;
use crate::normalize::TextNormalizer;
use crate::vectorizer::{FeatureVector, TfidfVectorizer};
use reviewcheck_core::{ClassProbabilities, Error, Label, Result};
use std::sync::Arc;

/// A loaded artifact: every prediction re-derives tokens from raw text
pub struct TextPipeline {
    name: String,
    classes: Vec<Label>,
    normalizer: Arc<TextNormalizer>,
    vectorizer: TfidfVectorizer,
    estimator: Box<dyn Estimator>,
}

impl TextPipeline {
    pub fn new(
        name: impl Into<String>,
        classes: Vec<Label>,
        normalizer: Arc<TextNormalizer>,
        vectorizer: TfidfVectorizer,
        estimator: Box<dyn Estimator>,
    ) -> Self {
        Self {
            name: name.into(),
            classes,
            normalizer,
            vectorizer,
            estimator,
        }
    }

    /// Estimator family, for logs
    pub fn estimator_kind(&self) -> &'static str {
        self.estimator.kind()
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    fn features(&self, text: &str) -> Result<FeatureVector> {
        let tokens = self.normalizer.normalize(text)?;
        Ok(self.vectorizer.transform(&tokens))
    }
}

impl Classifier for TextPipeline {
    fn predict(&self, text: &str) -> Result<Label> {
        let x = self.features(text)?;
        let idx = self.estimator.predict_index(&x);
        self.classes.get(idx).copied().ok_or_else(|| {
            Error::classifier(format!(
                "{} predicted class index {idx} outside {} classes",
                self.name,
                self.classes.len()
            ))
        })
    }

    fn predict_proba(&self, text: &str) -> Result<ClassProbabilities> {
        let x = self.features(text)?;
        let proba = self.estimator.predict_proba(&x);
        if proba.len() != self.classes.len() {
            return Err(Error::classifier(format!(
                "{} returned {} probabilities for {} classes",
                self.name,
                proba.len(),
                self.classes.len()
            )));
        }
        Ok(ClassProbabilities::new(&self.classes, &proba))
    }

    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TextPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPipeline")
            .field("name", &self.name)
            .field("classes", &self.classes)
            .field("estimator", &self.estimator.kind())
            .field("n_features", &self.vectorizer.n_features())
            .finish()
    }
}
