use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: search queries served. Labels: mode (browse|window).
pub const SEARCHES_TOTAL: &str = "huddle_searches_total";

/// Histogram: search latency in seconds.
pub const SEARCH_DURATION_SECONDS: &str = "huddle_search_duration_seconds";

/// Counter: booking attempts. Labels: status (ok or the error kind).
pub const BOOKINGS_TOTAL: &str = "huddle_bookings_total";

/// Counter: cancellations applied.
pub const CANCELLATIONS_TOTAL: &str = "huddle_cancellations_total";

// ── Engine metrics ──────────────────────────────────────────────

/// Gauge: rooms currently registered.
pub const ROOMS_REGISTERED: &str = "huddle_rooms_registered";

/// Counter: reservations flipped confirmed → completed by the sweeper.
pub const RESERVATIONS_COMPLETED_TOTAL: &str = "huddle_reservations_completed_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
