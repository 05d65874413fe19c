//! Metrics collection and Prometheus export.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Call once at startup, before any metrics are recorded. Subsequent calls
/// are no-ops so test harnesses can spawn several applications in one
/// process.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }
    if let Ok(handle) = PrometheusBuilder::new().install_recorder() {
        let _ = METRICS_HANDLE.set(handle);
    }
}

/// Current metrics in Prometheus text format, for the /metrics endpoint.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Record an opened draft session.
pub fn record_draft_opened(kind: &'static str) {
    counter!("drafts_opened_total", "kind" => kind).increment(1);
}

/// Record a successfully submitted document.
pub fn record_document_submitted(kind: &'static str) {
    counter!("documents_submitted_total", "kind" => kind).increment(1);
}
