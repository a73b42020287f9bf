use axum::Router;
use std::sync::Arc;

use roster_core::UserStore;

use crate::domains::users::service::UserQueries;

/// Per-request context; cloning shares the same store handle.
#[derive(Clone)]
pub struct AppState {
    pub users: UserQueries,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            users: UserQueries::new(store),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    crate::http::router().with_state(state)
}
