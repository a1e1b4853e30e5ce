use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("fills_stored_total").absolute(0);
    counter!("transfers_stored_total").absolute(0);
    counter!("poll_errors_total").absolute(0);
    counter!("reports_built_total").absolute(0);

    gauge!("tracked_addresses").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("poll_cycle_seconds").record(0.0);

    Ok(handle)
}

/// A handle that is not installed as the global recorder. Only one recorder
/// can exist per process, so tests build routers with this instead.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
