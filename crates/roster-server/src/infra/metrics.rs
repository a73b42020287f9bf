use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::PrometheusMetricLayer;
use prometheus::core::Collector;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, TextEncoder,
};
use roster_db::PgPool;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::warn;

/// Name used when a metric cannot be built under its own name.
const FALLBACK_METRIC_NAME: &str = "roster_metrics_fallback";

/// Builds a metric and registers it with the default registry. A registration
/// clash leaves the metric working but unexported; recording never panics.
fn register_metric<M, F>(name: &str, build: F) -> M
where
    M: Collector + Clone + 'static,
    F: Fn(&str) -> prometheus::Result<M>,
{
    let metric = match build(name) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_build_failed", metric = name, error = %err);
            build(FALLBACK_METRIC_NAME).expect("fallback metric")
        }
    };
    if let Err(err) = prometheus::register(Box::new(metric.clone())) {
        warn!(event = "metrics_register_failed", metric = name, error = %err);
    }
    metric
}

fn http_buckets() -> Vec<f64> {
    vec![
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

static HTTP_IN_FLIGHT: LazyLock<IntGauge> = LazyLock::new(|| {
    register_metric("roster_http_in_flight", |name| {
        IntGauge::new(name, "HTTP requests in flight")
    })
});

static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_metric("roster_http_requests_total", |name| {
        IntCounterVec::new(
            Opts::new(name, "HTTP requests"),
            &["method", "route", "status_class"],
        )
    })
});

static HTTP_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_metric("roster_http_request_duration_seconds", |name| {
        HistogramVec::new(
            HistogramOpts::new(name, "HTTP request latency").buckets(http_buckets()),
            &["route"],
        )
    })
});

static USER_LOOKUPS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_metric("roster_user_lookups_total", |name| {
        IntCounterVec::new(Opts::new(name, "Random user lookups"), &["result"])
    })
});

static SEED_RUNS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_metric("roster_seed_runs_total", |name| {
        IntCounterVec::new(Opts::new(name, "Fake user seeding runs"), &["result"])
    })
});

static DB_POOL_CONNECTIONS: LazyLock<IntGaugeVec> = LazyLock::new(|| {
    register_metric("roster_db_pool_connections", |name| {
        IntGaugeVec::new(Opts::new(name, "Database pool connections"), &["state"])
    })
});

// Installing the global recorder twice panics, so the handle is created once
// per process and shared by every router built afterwards.
static PROMETHEUS_HANDLE: LazyLock<PrometheusHandle> =
    LazyLock::new(|| PrometheusMetricLayer::pair().1);

pub fn http_metric_layer() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    let handle = PROMETHEUS_HANDLE.clone();
    (PrometheusMetricLayer::new(), handle)
}

/// Request metrics from `axum-prometheus`, then the process-wide registry.
pub fn render(handle: &PrometheusHandle) -> Response {
    let mut body = handle.render();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) if !buffer.is_empty() => {
            body.push('\n');
            body.push_str(&String::from_utf8_lossy(&buffer));
        }
        Ok(()) => {}
        Err(err) => warn!(event = "metrics_encode_failed", error = %err),
    }
    ([(CONTENT_TYPE, encoder.format_type().to_string())], body).into_response()
}

pub fn user_lookup(result: &str) {
    USER_LOOKUPS.with_label_values(&[result]).inc();
}

pub fn seed_run(result: &str) {
    SEED_RUNS.with_label_values(&[result]).inc();
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched")
        .to_string();
    HTTP_IN_FLIGHT.inc();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    HTTP_IN_FLIGHT.dec();
    record_http_request(&method, &route, response.status().as_u16(), elapsed);
    response
}

pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    let status_class = match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    };
    HTTP_REQUESTS
        .with_label_values(&[method, route, status_class])
        .inc();
    HTTP_LATENCY
        .with_label_values(&[route])
        .observe(duration_seconds);
}

pub fn start_db_pool_metrics(pool: PgPool, max_connections: u32) {
    let idle_metric = DB_POOL_CONNECTIONS.with_label_values(&["idle"]);
    let active_metric = DB_POOL_CONNECTIONS.with_label_values(&["active"]);
    let max_metric = DB_POOL_CONNECTIONS.with_label_values(&["max"]);
    max_metric.set(i64::from(max_connections));

    tokio::spawn(async move {
        loop {
            let idle = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
            let size = i64::from(pool.size());
            let active = (size - idle).max(0);
            idle_metric.set(idle);
            active_metric.set(active);
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}
