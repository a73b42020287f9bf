use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::any, Router};
use roster_core::{UserStore, FAKE_USER_COUNT};
use roster_db::{connect_postgres_lazy, repo::UserRepo, PgPool};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::app::{self, AppState};
use crate::config::{is_valid_metrics_endpoint, MetricsConfig, DEFAULT_METRICS_ENDPOINT};
use crate::domains::users::seed;
use crate::infra::metrics;
use crate::runtime::{self, ShutdownOutcome};
use crate::settings;

pub fn log_startup(settings: &settings::Settings) {
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        db_pool_max = settings.db_pool_max,
        shutdown_timeout_seconds = settings.shutdown_timeout.as_secs(),
        metrics_enabled = settings.config.metrics.enabled,
        metrics_endpoint = %settings.config.metrics.endpoint,
        "Server configuration loaded"
    );
}

pub fn init_metrics_registry(metrics_config: &MetricsConfig) {
    if !metrics_config.enabled {
        return;
    }
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        if prometheus::default_registry()
            .register(Box::new(process_collector))
            .is_err()
        {
            tracing::warn!("failed to register process metrics");
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("process metrics are only available on linux");
    }
}

/// Builds the pool without connecting; only a malformed DSN fails.
pub fn connect_db(settings: &settings::Settings) -> Result<PgPool, sqlx_core::Error> {
    connect_postgres_lazy(&settings.dsn, settings.db_pool_max)
}

pub fn user_store(pool: PgPool) -> Arc<dyn UserStore> {
    Arc::new(UserRepo::new(pool))
}

/// Ensures the schema and seeds fake users before the state is handed to the
/// router. Store failures are logged, never fatal.
pub async fn build_state(store: Arc<dyn UserStore>) -> AppState {
    seed::prepare_store(store.as_ref(), FAKE_USER_COUNT).await;
    AppState::new(store)
}

pub fn start_background_tasks(settings: &settings::Settings, pool: &PgPool) {
    if settings.config.metrics.enabled {
        metrics::start_db_pool_metrics(pool.clone(), settings.db_pool_max);
    }
}

pub fn build_app(metrics_config: &MetricsConfig, state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    let mut app = app::build_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(panic_response));
    if metrics_config.enabled {
        app = app.route_layer(middleware::from_fn(metrics::http_metrics));
        let (layer, handle) = metrics::http_metric_layer();
        app = app.layer(layer).route(
            metrics_endpoint(metrics_config),
            any(move || {
                let handle = handle.clone();
                async move { metrics::render(&handle) }
            }),
        );
    }
    app
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", MatchedPath::as_str);
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %route,
        request_id = %request_id
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

fn metrics_endpoint(metrics_config: &MetricsConfig) -> &str {
    if is_valid_metrics_endpoint(&metrics_config.endpoint) {
        &metrics_config.endpoint
    } else {
        tracing::warn!(
            event = "config_invalid",
            field = "metrics.endpoint",
            value = %metrics_config.endpoint,
            "serving metrics on {DEFAULT_METRICS_ENDPOINT}"
        );
        DEFAULT_METRICS_ENDPOINT
    }
}

/// Binds and serves until SIGINT/SIGTERM. A bind failure or a serve error
/// that is not a shutdown-triggered close ends the process.
pub async fn serve(settings: &settings::Settings, app: Router) {
    let addr = settings.addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(event = "server_bind_failed", %addr, error = %err);
            std::process::exit(1);
        }
    };
    tracing::info!(event = "server_listening", %addr, "Start HTTP server {addr}");

    match runtime::serve_until(
        listener,
        app,
        runtime::shutdown_signal(),
        settings.shutdown_timeout,
    )
    .await
    {
        Ok(ShutdownOutcome::Drained) => {
            tracing::info!(event = "server_shutdown", "HTTP server has been shutdown");
        }
        Ok(ShutdownOutcome::TimedOut) => {
            tracing::warn!(
                event = "server_shutdown_timeout",
                timeout_seconds = settings.shutdown_timeout.as_secs(),
                "HTTP server shutdown did not finish in time"
            );
        }
        Err(err) => {
            tracing::error!(event = "server_failed", error = %err);
            std::process::exit(1);
        }
    }
}
