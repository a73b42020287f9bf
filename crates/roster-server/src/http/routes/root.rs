use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};

pub(crate) const ROOT_BODY: &str = "root handler\n";

pub(crate) async fn root(
    method: Method,
    uri: Uri,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    let peer = peer.map(|ConnectInfo(addr)| addr.to_string());
    tracing::info!(
        event = "root_request",
        method = %method,
        uri = %uri,
        peer = peer.as_deref().unwrap_or("unknown"),
        "[ROOT HANDLER] request: {method} {uri}"
    );
    (StatusCode::OK, ROOT_BODY)
}
