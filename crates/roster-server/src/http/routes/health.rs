use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::any,
    Router,
};

use crate::app::AppState;

pub(crate) const HEALTH_BODY: &str = r#"{"status": "OK"}"#;

/// `/healthz/` is a subtree; the bare path redirects into it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", any(redirect_to_subtree))
        .route("/healthz/", any(health))
        .route("/healthz/*rest", any(health))
}

// Liveness only; never touches the store.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        HEALTH_BODY,
    )
}

async fn redirect_to_subtree() -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, "/healthz/")],
    )
}
