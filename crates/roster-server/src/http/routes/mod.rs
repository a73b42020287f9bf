use axum::{routing::any, Router};

use crate::app::AppState;

pub(crate) mod health;
pub(crate) mod root;

/// Every path not claimed by another route lands on the root handler.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::domains::users::http::router())
        .route("/", any(root::root))
        .fallback(root::root)
}
