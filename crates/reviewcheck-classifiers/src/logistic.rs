//! Binary logistic regression

use crate::estimator::{check_weights, sigmoid, Estimator};
use crate::vectorizer::FeatureVector;
use reviewcheck_core::{Error, Result};

/// Logistic regression scoring the second class
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(coef: Vec<f64>, intercept: f64, n_features: usize) -> Result<Self> {
        check_weights("logistic regression coef", &coef, n_features)?;
        if !intercept.is_finite() {
            return Err(Error::artifact("logistic regression intercept is not finite"));
        }
        Ok(Self { coef, intercept })
    }

    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        x.dot(&self.coef) + self.intercept
    }
}

impl Estimator for LogisticRegression {
    fn predict_index(&self, x: &FeatureVector) -> usize {
        usize::from(self.decision_function(x) > 0.0)
    }

    fn predict_proba(&self, x: &FeatureVector) -> Vec<f64> {
        let p = sigmoid(self.decision_function(x));
        vec![1.0 - p, p]
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}
