use crate::predict::{run_prediction, PredictError, PredictForm};
use crate::server::PageContext;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use std::sync::Arc;
use tracing::{error, warn};

// ============================================================================
// Form page
// ============================================================================

/// Empty form page
pub async fn home(State(state): State<AppState>) -> Response {
    metrics::counter!("reviewcheck_requests_total", "route" => "home").increment(1);

    render_page(&state, PageContext::empty(&state.registry))
}

/// Classify the submitted review and show the form again with the outcome.
///
/// Every failure, including a body that is not a valid form, is shown on
/// the page with status 200.
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    metrics::counter!("reviewcheck_requests_total", "route" => "predict").increment(1);

    let outcome = match form {
        Ok(Form(form)) => match form.into_request() {
            Ok(request) => run_prediction(Arc::clone(&state.registry), request).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(PredictError::Failed(rejection.body_text())),
    };

    let page = PageContext::empty(&state.registry);
    let page = match outcome {
        Ok(result) => page.with_result(result),
        Err(e) => {
            metrics::counter!("reviewcheck_prediction_errors_total", "kind" => e.kind())
                .increment(1);
            match &e {
                PredictError::ModelNotLoaded(key) => warn!("Requested model '{}' is not loaded", key),
                PredictError::Failed(cause) => error!("Prediction failed: {}", cause),
            }
            page.with_message(e.to_string())
        }
    };

    render_page(&state, page)
}

fn render_page(state: &AppState, page: PageContext) -> Response {
    match state.renderer.render(&page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render page: {e}"),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Operational endpoints
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let models: Vec<&str> = state
        .registry
        .keys()
        .into_iter()
        .map(|key| key.as_str())
        .collect();

    Json(serde_json::json!({ "status": "ok", "models": models }))
}

/// Prometheus text exposition
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
