use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished inside the drain window.
    Drained,
    /// The drain window elapsed with connections still open.
    TimedOut,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "roster_server=info,roster_db=info,tower_http=info,sqlx=warn".into());
    let format_json = std::env::var("LOG_FORMAT").unwrap_or_default() == "json";

    let registry = tracing_subscriber::registry().with(filter);
    if format_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(event = "shutdown_signal_failed", signal = "SIGINT", error = %err);
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(
                    event = "shutdown_signal_failed",
                    signal = "SIGTERM",
                    error = %err
                );
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(
        event = "shutdown_signal_received",
        signal,
        "Got signal '{signal}', the graceful shutdown will start"
    );
}

/// Serves `app` until `signal` resolves, then drains in-flight requests for at
/// most `drain_timeout`.
///
/// The signal future hands off to the drain deadline through a one-shot
/// channel, so the timer only starts once shutdown has begun.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> std::io::Result<ShutdownOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (drain_started_tx, drain_started_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        signal.await;
        let _ = drain_started_tx.send(());
    };
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .into_future();
    let drain_deadline = async move {
        if drain_started_rx.await.is_ok() {
            tokio::time::sleep(drain_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result.map(|()| ShutdownOutcome::Drained),
        () = drain_deadline => Ok(ShutdownOutcome::TimedOut),
    }
}
