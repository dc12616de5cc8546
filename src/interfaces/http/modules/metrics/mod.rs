//! Prometheus metrics endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

use std::sync::Mutex;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub use handlers::*;
pub use middleware::{http_metrics_middleware, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static PROM_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Install the process-wide Prometheus recorder, or return the handle of the
/// one already installed. A stop and restart within the same process reuses
/// the first recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let mut slot = PROM_HANDLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;
    tracing::info!("Prometheus metrics recorder installed");

    *slot = Some(handle.clone());
    Ok(handle)
}
