//! Process-wide service state

use metrics_exporter_prometheus::PrometheusHandle;
use newsclf_classifiers::{Classifier, LinearTextClassifier};
use newsclf_core::Result;
use newsclf_telemetry::{RequestLogger, RequestMetrics};
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// State shared across all requests.
///
/// Built by [`startup`](Self::startup) before the router exists, so handlers
/// always see both the classifier and the log sink.
#[derive(Clone)]
pub struct ServiceState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Loaded classifier; read-only after startup
    pub classifier: Arc<dyn Classifier>,

    /// Append-only prediction log
    pub request_log: Arc<RequestLogger>,

    /// In-process request counters
    pub metrics: RequestMetrics,

    /// Prometheus handle for rendering `/metrics`
    pub prometheus: Option<PrometheusHandle>,
}

impl ServiceState {
    /// Load the model and open the request log.
    ///
    /// Any failure here is fatal: the caller must not start serving.
    pub fn startup(config: &ServerConfig) -> Result<Self> {
        info!("Loading model from {:?}", config.model_path);
        let classifier = LinearTextClassifier::load(&config.model_path)?;

        info!("Opening request log at {:?}", config.log_path);
        let request_log = RequestLogger::open(&config.log_path)?;

        let state = Self::from_parts(config.clone(), Arc::new(classifier), request_log);
        info!("Setup completed");
        Ok(state)
    }

    /// Assemble state from already constructed collaborators
    pub fn from_parts(
        config: ServerConfig,
        classifier: Arc<dyn Classifier>,
        request_log: RequestLogger,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            request_log: Arc::new(request_log),
            metrics: RequestMetrics::new(),
            prometheus: None,
        }
    }

    /// Attach the installed Prometheus recorder
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Flush and close the request log.
    ///
    /// Only the first call closes the sink; later calls are no-ops.
    pub fn shutdown(&self) -> Result<()> {
        info!("Shutting down application");

        if self.request_log.close()? {
            let snapshot = self.metrics.snapshot();
            info!(
                "Served {} predictions ({} rejected, {} failed)",
                snapshot.served, snapshot.rejected, snapshot.failed
            );
        }

        Ok(())
    }
}
