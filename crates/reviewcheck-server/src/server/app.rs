use crate::config::ServerConfig;
use crate::server::{routes, PageRenderer};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use reviewcheck_classifiers::init_registry_from_config;
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Build the Axum application
pub fn build_app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(routes::home))
        // Anything other than POST falls back to the form page
        .route("/predict", post(routes::predict).fallback(routes::home))
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::prometheus_metrics))
        .fallback(routes::not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load models and the page template, then serve until a shutdown signal
pub async fn run_server(
    config: ServerConfig,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;

    let registry = init_registry_from_config(&config.classifiers);
    if registry.is_empty() {
        warn!("No models loaded; every prediction will report the model as not loaded");
    }

    let renderer = match &config.templates_dir {
        Some(dir) => {
            info!("Serving page template from {}", dir.display());
            PageRenderer::from_dir(dir)
        }
        None => PageRenderer::embedded(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load page template: {}", e))?;

    let mut state = AppState::new(registry, renderer);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let app = build_app(state, config.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
