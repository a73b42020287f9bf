use axum::{routing::any, Router};

use crate::app::AppState;

mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/count", any(handlers::count_users))
        .route("/user/random", any(handlers::random_user))
}
