//! Classifier trait and common types

use reviewcheck_core::{ClassProbabilities, Label, Result};
use std::time::Instant;

/// Trait for all review classifiers
///
/// Implementations receive raw review text and are responsible for their
/// own preprocessing. Calls are synchronous and may be CPU-heavy; async
/// callers should run them on a blocking thread.
pub trait Classifier: Send + Sync {
    /// Predict the most likely label
    fn predict(&self, text: &str) -> Result<Label>;

    /// Probability of every known label, in `classes()` order
    fn predict_proba(&self, text: &str) -> Result<ClassProbabilities>;

    /// Labels this classifier can emit
    fn classes(&self) -> &[Label];

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Run both `predict` and `predict_proba` and time them
    fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let label = self.predict(text)?;
        let probabilities = self.predict_proba(text)?;

        Ok(ClassificationResult {
            label,
            probabilities,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Predicted label
    pub label: Label,

    /// Per-label probabilities
    pub probabilities: ClassProbabilities,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Probability assigned to the predicted label
    pub fn score(&self) -> f64 {
        self.probabilities.get(self.label)
    }
}
