//! Linear support vector classifier with Platt-scaled probabilities

use crate::estimator::{check_weights, sigmoid, Estimator};
use crate::vectorizer::FeatureVector;
use reviewcheck_core::{Error, Result};

/// Linear SVC. The label comes from the margin sign; probabilities come
/// from a sigmoid fitted on held-out margins, so the two can disagree
/// near the boundary.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    coef: Vec<f64>,
    intercept: f64,
    platt_a: f64,
    platt_b: f64,
}

impl LinearSvc {
    pub fn new(
        coef: Vec<f64>,
        intercept: f64,
        platt_a: f64,
        platt_b: f64,
        n_features: usize,
    ) -> Result<Self> {
        check_weights("linear svc coef", &coef, n_features)?;
        if ![intercept, platt_a, platt_b].iter().all(|v| v.is_finite()) {
            return Err(Error::artifact("linear svc intercept or Platt parameters are not finite"));
        }
        Ok(Self {
            coef,
            intercept,
            platt_a,
            platt_b,
        })
    }

    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        x.dot(&self.coef) + self.intercept
    }
}

impl Estimator for LinearSvc {
    fn predict_index(&self, x: &FeatureVector) -> usize {
        usize::from(self.decision_function(x) > 0.0)
    }

    fn predict_proba(&self, x: &FeatureVector) -> Vec<f64> {
        // P(second class) = 1 / (1 + exp(A * f + B))
        let f = self.decision_function(x);
        let p = sigmoid(-(self.platt_a * f + self.platt_b));
        vec![1.0 - p, p]
    }

    fn kind(&self) -> &'static str {
        "linear_svc"
    }
}
