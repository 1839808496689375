// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for Hibiscus.
//!
//! All metrics share the `hibiscus_` namespace prefix.
//!
//! # Metrics Categories
//!
//! - **Cycle Metrics** - Refresh cycle outcomes and durations
//! - **Zone Metrics** - Commit outcomes and record counts per zone
//! - **Provider Metrics** - Fetched leases and lease source errors
//!
//! # Example
//!
//! ```rust,no_run
//! use hibiscus::metrics::{gather_metrics, record_cycle_success};
//!
//! record_cycle_success(std::time::Duration::from_millis(120));
//! println!("{}", gather_metrics().unwrap());
//! ```

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::constants::METRICS_SERVER_PATH;

/// Namespace prefix for all Hibiscus metrics
const METRICS_NAMESPACE: &str = "hibiscus";

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Cycle Metrics
// ============================================================================

/// Total number of refresh cycles by status
///
/// Labels:
/// - `status`: Outcome (`success`, `error`, `skipped`)
pub static CYCLES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_cycles_total"),
        "Total number of refresh cycles by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of refresh cycles in seconds
pub static CYCLE_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_cycle_duration_seconds"),
        "Duration of refresh cycles in seconds",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Zone Metrics
// ============================================================================

/// Total number of zonefile commits by zone and status
///
/// Labels:
/// - `zone`: Zone key
/// - `status`: Outcome (`changed`, `unchanged`, `error`)
pub static ZONE_COMMITS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_commits_total"),
        "Total number of zonefile commits by zone and status",
    );
    let counter = CounterVec::new(opts, &["zone", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Number of records in the last generated zonefile
///
/// Labels:
/// - `zone`: Zone key
pub static ZONE_RECORDS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_records"),
        "Number of records in the last generated zonefile",
    );
    let gauge = GaugeVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Provider Metrics
// ============================================================================

/// Number of leases returned by the last successful fetch
pub static LEASES_FETCHED: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_leases_fetched"),
        "Number of leases returned by the last successful fetch",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Total number of lease provider errors by kind
///
/// Labels:
/// - `kind`: Error category (`http`, `transport`, `credentials`, `decode`, `client`)
pub static PROVIDER_ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_provider_errors_total"),
        "Total number of lease provider errors by kind",
    );
    let counter = CounterVec::new(opts, &["kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a completed refresh cycle
pub fn record_cycle_success(duration: Duration) {
    CYCLES_TOTAL.with_label_values(&["success"]).inc();
    CYCLE_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed refresh cycle
pub fn record_cycle_error(duration: Duration) {
    CYCLES_TOTAL.with_label_values(&["error"]).inc();
    CYCLE_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a cycle skipped because the previous one was still running
pub fn record_cycle_skipped() {
    CYCLES_TOTAL.with_label_values(&["skipped"]).inc();
}

/// Record a zonefile commit outcome
///
/// # Arguments
/// * `zone` - Zone key
/// * `status` - `changed`, `unchanged` or `error`
pub fn record_zone_commit(zone: &str, status: &str) {
    ZONE_COMMITS_TOTAL.with_label_values(&[zone, status]).inc();
}

/// Record the number of records generated for a zone
#[allow(clippy::cast_precision_loss)]
pub fn record_zone_records(zone: &str, count: usize) {
    ZONE_RECORDS.with_label_values(&[zone]).set(count as f64);
}

/// Record the number of leases fetched in a cycle
#[allow(clippy::cast_precision_loss)]
pub fn record_leases_fetched(count: usize) {
    LEASES_FETCHED.set(count as f64);
}

/// Record a lease provider error
pub fn record_provider_error(kind: &str) {
    PROVIDER_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

// ============================================================================
// HTTP Exposition
// ============================================================================

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Router exposing the registry at `/metrics`
pub fn router() -> Router {
    Router::new().route(METRICS_SERVER_PATH, get(metrics_handler))
}

/// Serve metrics on an already bound listener until the task is dropped
///
/// # Errors
/// Returns error if the server stops on an I/O failure
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, path = METRICS_SERVER_PATH, "Serving Prometheus metrics");
    }
    axum::serve(listener, router()).await
}

/// Bind `addr` and serve metrics on it
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails
pub async fn serve_on(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener).await
}
