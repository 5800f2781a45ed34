use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder.
///
/// Call once from `main`; the returned handle renders the text exposition for
/// the `/metrics` endpoint.
pub fn init_metrics() -> Result<PrometheusHandle, anyhow::Error> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
}
