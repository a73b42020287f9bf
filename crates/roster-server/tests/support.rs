#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use std::sync::Arc;
use tower::ServiceExt;

use roster_core::memory::MemoryUserStore;
use roster_core::NewUser;
use roster_server::app::AppState;
use roster_server::bootstrap;
use roster_server::config::MetricsConfig;

pub struct TestApp {
    pub app: axum::Router,
    pub store: Arc<MemoryUserStore>,
}

impl TestApp {
    pub fn new(users: Vec<NewUser>) -> Self {
        Self::with_metrics(users, MetricsConfig::default())
    }

    pub fn with_metrics(users: Vec<NewUser>, metrics_config: MetricsConfig) -> Self {
        let store = Arc::new(MemoryUserStore::with_users(users));
        let state = AppState::new(store.clone());
        let app = bootstrap::build_app(&metrics_config, state);
        Self { app, store }
    }

    pub async fn request(&self, method: Method, path: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("request");
        self.app.clone().oneshot(request).await.expect("response")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.request(Method::GET, path).await
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8_lossy(&bytes).into_owned()
}
