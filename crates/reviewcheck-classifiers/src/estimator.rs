//! Fitted estimators operating on vectorized reviews

use crate::vectorizer::FeatureVector;

/// A fitted model over a fixed number of features and two or more classes
pub trait Estimator: Send + Sync {
    /// Index into the artifact's class list of the predicted class
    fn predict_index(&self, x: &FeatureVector) -> usize;

    /// Probability per class, in the artifact's class order
    fn predict_proba(&self, x: &FeatureVector) -> Vec<f64>;

    /// Short estimator name used in logs
    fn kind(&self) -> &'static str;
}

/// Logistic function that does not overflow for large `|z|`
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn check_weights(name: &str, weights: &[f64], n_features: usize) -> reviewcheck_core::Result<()> {
    if weights.len() != n_features {
        return Err(reviewcheck_core::Error::artifact(format!(
            "{name} has {} weights, expected {n_features}",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(reviewcheck_core::Error::artifact(format!(
            "{name} contains non-finite weights"
        )));
    }
    Ok(())
}
