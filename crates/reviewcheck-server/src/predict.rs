//! Request-level prediction flow
//!
//! Resolves the requested model, runs it on the raw review and turns the
//! outcome into display values. Every failure becomes a [`PredictError`]
//! whose `Display` is the message shown on the page.

use reviewcheck_classifiers::ModelRegistry;
use reviewcheck_core::{PredictionRequest, PredictionResult};
use serde::Deserialize;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Fields posted by the form page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictForm {
    pub review: Option<String>,
    pub model_choice: Option<String>,
}

impl PredictForm {
    /// Require both fields, checking `review` first
    pub fn into_request(self) -> Result<PredictionRequest, PredictError> {
        let review = self.review.ok_or_else(|| missing_field("review"))?;
        let model_choice = self
            .model_choice
            .ok_or_else(|| missing_field("model_choice"))?;
        Ok(PredictionRequest::new(review, model_choice))
    }
}

fn missing_field(name: &str) -> PredictError {
    PredictError::Failed(format!("missing form field '{name}'"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    /// Unknown key, or a key whose artifact did not load
    #[error("Error: Model '{0}' is not loaded.")]
    ModelNotLoaded(String),

    #[error("An error occurred during prediction: {0}")]
    Failed(String),
}

impl PredictError {
    /// Label value for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelNotLoaded(_) => "model_not_loaded",
            Self::Failed(_) => "prediction_failed",
        }
    }
}

/// Run the requested model on the review, synchronously
pub fn predict_with(
    registry: &ModelRegistry,
    request: &PredictionRequest,
) -> Result<PredictionResult, PredictError> {
    let (key, classifier) = registry
        .lookup(&request.model_choice)
        .ok_or_else(|| PredictError::ModelNotLoaded(request.model_choice.clone()))?;

    let start = Instant::now();
    let label = classifier
        .predict(&request.review)
        .map_err(|e| PredictError::Failed(e.to_string()))?;
    let probabilities = classifier
        .predict_proba(&request.review)
        .map_err(|e| PredictError::Failed(e.to_string()))?;
    let latency_us = start.elapsed().as_micros() as f64;

    metrics::histogram!("reviewcheck_prediction_latency_us", "model" => key.as_str())
        .record(latency_us);
    metrics::counter!(
        "reviewcheck_predictions_total",
        "model" => key.as_str(),
        "verdict" => label.code()
    )
    .increment(1);

    debug!(model = %key, label = %label, latency_us, "prediction complete");

    Ok(PredictionResult::from_prediction(
        request.review.clone(),
        key,
        label,
        &probabilities,
    ))
}

/// Run [`predict_with`] on the blocking pool. A panicking classifier is
/// reported as a failed prediction.
pub async fn run_prediction(
    registry: Arc<ModelRegistry>,
    request: PredictionRequest,
) -> Result<PredictionResult, PredictError> {
    let task = tokio::task::spawn_blocking(move || predict_with(&registry, &request));

    match task.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(PredictError::Failed(panic_message(e.into_panic()))),
        Err(e) => Err(PredictError::Failed(e.to_string())),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "classifier panicked".to_string()
    }
}
