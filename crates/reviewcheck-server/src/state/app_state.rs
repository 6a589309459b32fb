use crate::server::PageRenderer;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewcheck_classifiers::ModelRegistry;
use std::sync::Arc;

/// Shared application state. Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifiers
    pub registry: Arc<ModelRegistry>,

    /// Form page renderer
    pub renderer: Arc<PageRenderer>,

    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(registry: ModelRegistry, renderer: PageRenderer) -> Self {
        Self {
            registry: Arc::new(registry),
            renderer: Arc::new(renderer),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
